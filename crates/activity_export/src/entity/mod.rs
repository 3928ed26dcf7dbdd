//! SeaORM entity definitions for the site, user and content tables.

pub mod challenge;
pub mod idea;
pub mod idea_vote;
pub mod prelude;
pub mod site;
pub mod user;
