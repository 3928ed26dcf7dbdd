//! User activity classification.
//!
//! A user is *active* on a site when they created at least one challenge,
//! idea or idea vote there, and *inactive* otherwise. Classification is a
//! pure function over a [`SiteActivity`] snapshot so that it can be tested
//! without a database; [`query`] loads that snapshot for a site.
//!
//! # Example
//!
//! ```ignore
//! use activity_export::activity;
//!
//! let site = activity::find_site_by_domain(&db, "example.com").await?.unwrap();
//! let report = activity::load_site_activity(&db, &site).await?.classify();
//!
//! for entry in &report.active {
//!     println!("{} -> {}", entry.user.email, entry.activity.label);
//! }
//! ```

mod query;

use std::collections::HashMap;

use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use serde::Serialize;

use crate::entity::{challenge, idea, idea_vote, user};

pub use query::{find_managers, find_site_by_domain, load_site_activity};

/// The kind of record that marks a user as active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Challenge,
    Idea,
    Vote,
}

impl ActivityKind {
    /// Rank used to pick the representative activity. Higher wins.
    fn priority(self) -> u8 {
        match self {
            ActivityKind::Challenge => 3,
            ActivityKind::Idea => 2,
            ActivityKind::Vote => 1,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityKind::Challenge => write!(f, "challenge"),
            ActivityKind::Idea => write!(f, "idea"),
            ActivityKind::Vote => write!(f, "vote"),
        }
    }
}

/// One recorded activity, described for a report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub kind: ActivityKind,
    /// Human-readable description written to the report.
    pub label: String,
    /// ID of the challenge, idea or vote record.
    pub record_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

impl Activity {
    fn rank(&self) -> (u8, DateTimeWithTimeZone, Uuid) {
        (self.kind.priority(), self.created_at, self.record_id)
    }
}

/// An active user together with their representative activity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveUser {
    pub user: user::Model,
    pub activity: Activity,
    /// Number of challenges, ideas and votes the user created on the site.
    pub activity_count: usize,
}

/// Result of classifying every user on a site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActivityReport {
    pub active: Vec<ActiveUser>,
    pub inactive: Vec<user::Model>,
}

impl ActivityReport {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    pub fn total_users(&self) -> usize {
        self.active.len() + self.inactive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_users() == 0
    }
}

/// In-memory snapshot of one site's users and content.
#[derive(Clone, Debug, Default)]
pub struct SiteActivity {
    /// Users in report order.
    pub users: Vec<user::Model>,
    pub challenges: Vec<challenge::Model>,
    pub ideas: Vec<idea::Model>,
    pub votes: Vec<idea_vote::Model>,
}

#[derive(Default)]
struct Tally {
    best: Option<Activity>,
    count: usize,
}

impl Tally {
    fn record(&mut self, activity: Activity) {
        self.count += 1;
        let replace = match &self.best {
            Some(best) => activity.rank() > best.rank(),
            None => true,
        };
        if replace {
            self.best = Some(activity);
        }
    }
}

impl SiteActivity {
    /// Partition the snapshot's users into active and inactive.
    ///
    /// The representative activity of an active user is chosen by kind
    /// (challenge, then idea, then vote) and, within a kind, by the most
    /// recent record; equal timestamps fall back to the larger record ID.
    /// Both output lists keep the order of [`SiteActivity::users`].
    /// Records created by users outside the snapshot are ignored.
    pub fn classify(&self) -> ActivityReport {
        let idea_names: HashMap<Uuid, &str> = self
            .ideas
            .iter()
            .map(|idea| (idea.id, idea.name.as_str()))
            .collect();

        let mut tallies: HashMap<Uuid, Tally> = HashMap::new();

        for challenge in &self.challenges {
            tallies
                .entry(challenge.creator_id)
                .or_default()
                .record(Activity {
                    kind: ActivityKind::Challenge,
                    label: challenge.name.clone(),
                    record_id: challenge.id,
                    created_at: challenge.created_at,
                });
        }

        for idea in &self.ideas {
            tallies.entry(idea.creator_id).or_default().record(Activity {
                kind: ActivityKind::Idea,
                label: idea.name.clone(),
                record_id: idea.id,
                created_at: idea.created_at,
            });
        }

        for vote in &self.votes {
            tallies.entry(vote.creator_id).or_default().record(Activity {
                kind: ActivityKind::Vote,
                label: vote_label(idea_names.get(&vote.idea_id).copied()),
                record_id: vote.id,
                created_at: vote.created_at,
            });
        }

        let mut report = ActivityReport::default();
        for user in &self.users {
            match tallies.remove(&user.id) {
                Some(Tally {
                    best: Some(activity),
                    count,
                }) => report.active.push(ActiveUser {
                    user: user.clone(),
                    activity,
                    activity_count: count,
                }),
                _ => report.inactive.push(user.clone()),
            }
        }

        report
    }
}

fn vote_label(idea_name: Option<&str>) -> String {
    match idea_name {
        Some(name) => format!("Voted on \"{}\"", name),
        None => "Voted on an idea".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(minutes: i64) -> DateTimeWithTimeZone {
        (Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes))
            .fixed_offset()
    }

    fn make_user(site_id: Uuid, email: &str, is_manager: bool, minutes: i64) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            site_id,
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            is_contributor: !is_manager,
            is_manager,
            created_at: at(minutes),
        }
    }

    fn make_challenge(creator: &user::Model, name: &str, minutes: i64) -> challenge::Model {
        challenge::Model {
            id: Uuid::new_v4(),
            site_id: creator.site_id,
            creator_id: creator.id,
            name: name.to_string(),
            description: None,
            created_at: at(minutes),
        }
    }

    fn make_idea(
        creator: &user::Model,
        challenge: &challenge::Model,
        name: &str,
        minutes: i64,
    ) -> idea::Model {
        idea::Model {
            id: Uuid::new_v4(),
            site_id: creator.site_id,
            challenge_id: challenge.id,
            creator_id: creator.id,
            name: name.to_string(),
            summary: None,
            created_at: at(minutes),
        }
    }

    fn make_vote(creator: &user::Model, idea: &idea::Model, minutes: i64) -> idea_vote::Model {
        idea_vote::Model {
            id: Uuid::new_v4(),
            idea_id: idea.id,
            creator_id: creator.id,
            created_at: at(minutes),
        }
    }

    #[test]
    fn empty_snapshot_yields_empty_report() {
        let report = SiteActivity::default().classify();
        assert!(report.is_empty());
        assert_eq!(report.active_count(), 0);
        assert_eq!(report.inactive_count(), 0);
    }

    #[test]
    fn users_without_records_are_inactive() {
        let site = Uuid::new_v4();
        let snapshot = SiteActivity {
            users: vec![
                make_user(site, "a@example.com", false, 0),
                make_user(site, "b@example.com", true, 1),
            ],
            ..Default::default()
        };

        let report = snapshot.classify();
        assert!(report.active.is_empty());
        let emails: Vec<_> = report.inactive.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, ["a@example.com", "b@example.com"]);
    }

    #[test]
    fn contributor_idea_and_manager_challenge_are_both_active() {
        let site = Uuid::new_v4();
        let contributor = make_user(site, "contributor@example.com", false, 0);
        let manager = make_user(site, "manager@example.com", true, 1);
        let challenge = make_challenge(&manager, "Example challenge", 2);
        let idea = make_idea(&contributor, &challenge, "Test idea for our challenge", 3);
        let vote = make_vote(&contributor, &idea, 4);

        let snapshot = SiteActivity {
            users: vec![contributor.clone(), manager.clone()],
            challenges: vec![challenge],
            ideas: vec![idea],
            votes: vec![vote],
        };

        let report = snapshot.classify();
        assert!(report.inactive.is_empty());
        assert_eq!(report.active.len(), 2);

        assert_eq!(report.active[0].user.email, "contributor@example.com");
        assert_eq!(report.active[0].activity.kind, ActivityKind::Idea);
        assert_eq!(report.active[0].activity.label, "Test idea for our challenge");
        assert_eq!(report.active[0].activity_count, 2);

        assert_eq!(report.active[1].user.email, "manager@example.com");
        assert_eq!(report.active[1].activity.kind, ActivityKind::Challenge);
        assert_eq!(report.active[1].activity.label, "Example challenge");
        assert_eq!(report.active[1].activity_count, 1);
    }

    #[test]
    fn challenge_outranks_newer_idea() {
        let site = Uuid::new_v4();
        let user = make_user(site, "busy@example.com", false, 0);
        let challenge = make_challenge(&user, "Old challenge", 1);
        let idea = make_idea(&user, &challenge, "New idea", 50);

        let report = SiteActivity {
            users: vec![user],
            challenges: vec![challenge],
            ideas: vec![idea],
            votes: vec![],
        }
        .classify();

        assert_eq!(report.active[0].activity.kind, ActivityKind::Challenge);
        assert_eq!(report.active[0].activity.label, "Old challenge");
    }

    #[test]
    fn most_recent_record_wins_within_kind() {
        let site = Uuid::new_v4();
        let user = make_user(site, "author@example.com", false, 0);
        let manager = make_user(site, "manager@example.com", true, 0);
        let challenge = make_challenge(&manager, "Host", 0);
        let first = make_idea(&user, &challenge, "First idea", 5);
        let second = make_idea(&user, &challenge, "Second idea", 10);

        let report = SiteActivity {
            users: vec![user],
            challenges: vec![],
            ideas: vec![second, first],
            votes: vec![],
        }
        .classify();

        assert_eq!(report.active[0].activity.label, "Second idea");
        assert_eq!(report.active[0].activity_count, 2);
    }

    #[test]
    fn vote_only_user_gets_vote_label() {
        let site = Uuid::new_v4();
        let author = make_user(site, "author@example.com", false, 0);
        let voter = make_user(site, "voter@example.com", false, 1);
        let challenge = make_challenge(&author, "Challenge", 2);
        let idea = make_idea(&author, &challenge, "Bike racks", 3);
        let vote = make_vote(&voter, &idea, 4);

        let report = SiteActivity {
            users: vec![voter],
            challenges: vec![],
            ideas: vec![idea],
            votes: vec![vote],
        }
        .classify();

        assert_eq!(report.active[0].activity.kind, ActivityKind::Vote);
        assert_eq!(report.active[0].activity.label, "Voted on \"Bike racks\"");
    }

    #[test]
    fn vote_on_unknown_idea_has_generic_label() {
        assert_eq!(vote_label(None), "Voted on an idea");
    }

    #[test]
    fn records_from_users_outside_snapshot_are_ignored() {
        let site = Uuid::new_v4();
        let member = make_user(site, "member@example.com", false, 0);
        let outsider = make_user(Uuid::new_v4(), "outsider@other.org", true, 0);
        let challenge = make_challenge(&outsider, "Elsewhere", 1);

        let report = SiteActivity {
            users: vec![member],
            challenges: vec![challenge],
            ideas: vec![],
            votes: vec![],
        }
        .classify();

        assert!(report.active.is_empty());
        assert_eq!(report.inactive.len(), 1);
        assert_eq!(report.inactive[0].email, "member@example.com");
    }

    #[test]
    fn report_order_follows_snapshot_order() {
        let site = Uuid::new_v4();
        let users: Vec<_> = ["c@example.com", "a@example.com", "b@example.com"]
            .iter()
            .enumerate()
            .map(|(i, email)| make_user(site, email, false, i as i64))
            .collect();
        let challenge = make_challenge(&users[2], "Only one", 5);

        let report = SiteActivity {
            users: users.clone(),
            challenges: vec![challenge],
            ideas: vec![],
            votes: vec![],
        }
        .classify();

        assert_eq!(report.active[0].user.email, "b@example.com");
        let inactive: Vec<_> = report.inactive.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(inactive, ["c@example.com", "a@example.com"]);
        assert_eq!(report.total_users(), 3);
    }

    #[test]
    fn activity_kind_display() {
        assert_eq!(ActivityKind::Challenge.to_string(), "challenge");
        assert_eq!(ActivityKind::Idea.to_string(), "idea");
        assert_eq!(ActivityKind::Vote.to_string(), "vote");
    }
}
