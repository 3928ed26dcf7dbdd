//! Common re-exports for convenient entity usage.

pub use super::challenge::{
    ActiveModel as ChallengeActiveModel, Column as ChallengeColumn, Entity as Challenge,
    Model as ChallengeModel,
};
pub use super::idea::{
    ActiveModel as IdeaActiveModel, Column as IdeaColumn, Entity as Idea, Model as IdeaModel,
};
pub use super::idea_vote::{
    ActiveModel as IdeaVoteActiveModel, Column as IdeaVoteColumn, Entity as IdeaVote,
    Model as IdeaVoteModel,
};
pub use super::site::{
    ActiveModel as SiteActiveModel, Column as SiteColumn, Entity as Site, Model as SiteModel,
};
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
    UserRole,
};
