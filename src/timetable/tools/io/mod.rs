pub mod excel_read;
pub mod excel_write;
pub mod reference;
pub mod template;
pub mod xlsx_template;
