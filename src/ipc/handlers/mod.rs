pub mod attendance;
pub mod books;
pub mod classes;
pub mod core;
pub mod id_cards;
pub mod inventory;
pub mod notices;
pub mod reports;
pub mod salary;
pub mod students;
pub mod teachers;
