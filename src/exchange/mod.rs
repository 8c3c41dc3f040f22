pub mod quotex;

pub use quotex::QuotexSession;
