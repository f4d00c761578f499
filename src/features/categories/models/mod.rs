mod category;

pub use category::CategoryRecord;
