pub use super::quote::Entity as Quotes;
