//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.
//! Money columns hold integer cents; `crate::core::money::Money` converts them.

pub mod deposit;
pub mod employee;
pub mod product;
pub mod purchase;

// Re-export specific types to avoid conflicts
pub use deposit::{Column as DepositColumn, Entity as Deposit, Model as DepositModel};
pub use employee::{Column as EmployeeColumn, Entity as Employee, Model as EmployeeModel};
pub use product::{
    Category, Column as ProductColumn, Entity as Product, Model as ProductModel,
};
pub use purchase::{Column as PurchaseColumn, Entity as Purchase, Model as PurchaseModel};
