pub mod record;
pub mod rows;
pub mod view;
