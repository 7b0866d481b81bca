//! SeaORM entities for the course catalog, resources, users and reviews.

pub mod course;
pub mod course_offering;
pub mod course_tag;
pub mod department;
pub mod professor;
pub mod resource;
pub mod review;
pub mod role;
pub mod tag;
pub mod user;
pub mod user_role;

pub use resource::ResourceType;
