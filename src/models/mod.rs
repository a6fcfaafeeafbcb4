pub mod delivery;
pub mod invoice;
pub mod package;
pub mod trip;
pub mod user;
