//! Goal bookkeeping over an in-memory [`Snapshot`].
//!
//! Every operation validates before it mutates, so a returned error always
//! leaves the snapshot exactly as it was and the caller can skip the save.

use crate::errors::{LedgerError, LedgerResult};
use crate::models::{coerce_points, Goal, GoalExport, Snapshot, SubGoal, UserRecord};
use chrono::{NaiveDate, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use uuid::Uuid;

const SALT_BYTES: usize = 16;

pub fn create_user(snapshot: &mut Snapshot, username: &str, password: &str) -> LedgerResult<UserRecord> {
    let username = username.trim();
    if username.is_empty() {
        return Err(LedgerError::InvalidInput("username must not be empty".into()));
    }
    if snapshot.users.contains_key(username) {
        return Err(LedgerError::AlreadyExists(format!("user '{username}'")));
    }

    let salt = hex::encode(rand::random::<[u8; SALT_BYTES]>());
    let record = UserRecord {
        password_hash: hash_password(password, &salt),
        salt,
        created_at: Utc::now(),
        goals: Vec::new(),
    };
    snapshot.users.insert(username.to_string(), record.clone());
    Ok(record)
}

pub fn verify_user(snapshot: &Snapshot, username: &str, password: &str) -> bool {
    snapshot
        .users
        .get(username.trim())
        .is_some_and(|user| hash_password(password, &user.salt) == user.password_hash)
}

pub fn goals<'a>(snapshot: &'a Snapshot, username: &str) -> LedgerResult<&'a [Goal]> {
    Ok(&user(snapshot, username)?.goals)
}

pub fn find_goal<'a>(snapshot: &'a Snapshot, username: &str, goal_id: &str) -> LedgerResult<&'a Goal> {
    user(snapshot, username)?
        .goals
        .iter()
        .find(|goal| goal.id == goal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("goal '{goal_id}'")))
}

pub fn find_subgoal<'a>(
    snapshot: &'a Snapshot,
    username: &str,
    goal_id: &str,
    subgoal_id: &str,
) -> LedgerResult<&'a SubGoal> {
    find_goal(snapshot, username, goal_id)?
        .sub_goals
        .iter()
        .find(|sub| sub.id == subgoal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("sub-goal '{subgoal_id}'")))
}

pub fn add_goal(
    snapshot: &mut Snapshot,
    username: &str,
    title: &str,
    due: Option<NaiveDate>,
) -> LedgerResult<Goal> {
    let title = clean_title(title, "goal")?;
    let user = user_mut(snapshot, username)?;
    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        title,
        due,
        progress: 0,
        sub_goals: Vec::new(),
    };
    user.goals.push(goal.clone());
    Ok(goal)
}

/// Removes the goal together with all of its sub-goals.
pub fn delete_goal(snapshot: &mut Snapshot, username: &str, goal_id: &str) -> LedgerResult<Goal> {
    let user = user_mut(snapshot, username)?;
    let index = user
        .goals
        .iter()
        .position(|goal| goal.id == goal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("goal '{goal_id}'")))?;
    Ok(user.goals.remove(index))
}

pub fn add_subgoal(
    snapshot: &mut Snapshot,
    username: &str,
    goal_id: &str,
    title: &str,
    points: Option<i64>,
    due: Option<NaiveDate>,
) -> LedgerResult<Goal> {
    let title = clean_title(title, "sub-goal")?;
    let goal = goal_mut(snapshot, username, goal_id)?;
    goal.sub_goals.push(SubGoal {
        id: Uuid::new_v4().to_string(),
        title,
        points: coerce_points(points),
        done: false,
        due,
    });
    goal.progress = compute_progress(goal);
    Ok(goal.clone())
}

pub fn toggle_subgoal(
    snapshot: &mut Snapshot,
    username: &str,
    goal_id: &str,
    subgoal_id: &str,
    done: bool,
) -> LedgerResult<Goal> {
    let goal = goal_mut(snapshot, username, goal_id)?;
    let sub = goal
        .sub_goals
        .iter_mut()
        .find(|sub| sub.id == subgoal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("sub-goal '{subgoal_id}'")))?;
    sub.done = done;
    goal.progress = compute_progress(goal);
    Ok(goal.clone())
}

pub fn delete_subgoal(
    snapshot: &mut Snapshot,
    username: &str,
    goal_id: &str,
    subgoal_id: &str,
) -> LedgerResult<Goal> {
    let goal = goal_mut(snapshot, username, goal_id)?;
    let index = goal
        .sub_goals
        .iter()
        .position(|sub| sub.id == subgoal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("sub-goal '{subgoal_id}'")))?;
    goal.sub_goals.remove(index);
    goal.progress = compute_progress(goal);
    Ok(goal.clone())
}

/// Weighted completion: `round(100 * done_points / total_points)`, 0 without sub-goals.
pub fn compute_progress(goal: &Goal) -> u8 {
    let total: u64 = goal.sub_goals.iter().map(|sub| u64::from(sub.points)).sum();
    if total == 0 {
        return 0;
    }
    let done: u64 = goal
        .sub_goals
        .iter()
        .filter(|sub| sub.done)
        .map(|sub| u64::from(sub.points))
        .sum();
    // half-up rounding in integers; done <= total keeps this within 0..=100
    ((200 * done + total) / (2 * total)) as u8
}

pub fn export_goals(snapshot: &Snapshot, username: &str) -> LedgerResult<GoalExport> {
    let user = user(snapshot, username)?;
    Ok(GoalExport {
        username: username.trim().to_string(),
        exported_at: Utc::now(),
        goals: user.goals.clone(),
    })
}

/// Replaces the user's whole goal tree with the backup's goals.
///
/// The backup's own `username` is informational only, so a tree can be
/// restored into a different account.
pub fn import_goals<'a>(
    snapshot: &'a mut Snapshot,
    username: &str,
    backup: GoalExport,
) -> LedgerResult<&'a [Goal]> {
    let mut goal_ids = HashSet::new();
    let mut imported = Vec::with_capacity(backup.goals.len());
    for goal in backup.goals {
        if goal.id.trim().is_empty() || !goal_ids.insert(goal.id.clone()) {
            return Err(LedgerError::InvalidInput(format!("duplicate or empty goal id '{}'", goal.id)));
        }
        let mut sub_ids = HashSet::new();
        let mut sub_goals = Vec::with_capacity(goal.sub_goals.len());
        for sub in goal.sub_goals {
            if sub.id.trim().is_empty() || !sub_ids.insert(sub.id.clone()) {
                return Err(LedgerError::InvalidInput(format!(
                    "duplicate or empty sub-goal id '{}' in goal '{}'",
                    sub.id, goal.id
                )));
            }
            sub_goals.push(SubGoal {
                title: clean_title(&sub.title, "sub-goal")?,
                points: sub.points.max(1),
                ..sub
            });
        }
        let mut goal = Goal {
            title: clean_title(&goal.title, "goal")?,
            sub_goals,
            ..goal
        };
        goal.progress = compute_progress(&goal);
        imported.push(goal);
    }

    let user = user_mut(snapshot, username)?;
    user.goals = imported;
    Ok(&user.goals)
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

fn clean_title(title: &str, what: &str) -> LedgerResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(LedgerError::InvalidInput(format!("{what} title must not be empty")));
    }
    Ok(title.to_string())
}

fn user<'a>(snapshot: &'a Snapshot, username: &str) -> LedgerResult<&'a UserRecord> {
    snapshot
        .users
        .get(username.trim())
        .ok_or_else(|| LedgerError::NotFound(format!("user '{}'", username.trim())))
}

fn user_mut<'a>(snapshot: &'a mut Snapshot, username: &str) -> LedgerResult<&'a mut UserRecord> {
    snapshot
        .users
        .get_mut(username.trim())
        .ok_or_else(|| LedgerError::NotFound(format!("user '{}'", username.trim())))
}

fn goal_mut<'a>(snapshot: &'a mut Snapshot, username: &str, goal_id: &str) -> LedgerResult<&'a mut Goal> {
    user_mut(snapshot, username)?
        .goals
        .iter_mut()
        .find(|goal| goal.id == goal_id)
        .ok_or_else(|| LedgerError::NotFound(format!("goal '{goal_id}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_user(name: &str) -> Snapshot {
        let mut snapshot = Snapshot::default();
        create_user(&mut snapshot, name, "secret").unwrap();
        snapshot
    }

    fn goal_with(weights: &[u32], done: &[bool]) -> Goal {
        Goal {
            id: "g".into(),
            title: "goal".into(),
            due: None,
            progress: 0,
            sub_goals: weights
                .iter()
                .zip(done)
                .enumerate()
                .map(|(i, (&points, &done))| SubGoal {
                    id: format!("s{i}"),
                    title: format!("step {i}"),
                    points,
                    done,
                    due: None,
                })
                .collect(),
        }
    }

    #[test]
    fn progress_is_weighted_and_rounded() {
        assert_eq!(compute_progress(&goal_with(&[1, 1, 2], &[true, false, true])), 75);
        assert_eq!(compute_progress(&goal_with(&[1, 1, 1], &[true, false, false])), 33);
        assert_eq!(compute_progress(&goal_with(&[1, 1, 1], &[true, true, false])), 67);
        assert_eq!(compute_progress(&goal_with(&[1, 7], &[true, false])), 13);
        assert_eq!(compute_progress(&goal_with(&[3, 5], &[true, true])), 100);
        assert_eq!(compute_progress(&goal_with(&[3, 5], &[false, false])), 0);
    }

    #[test]
    fn progress_without_subgoals_is_zero() {
        assert_eq!(compute_progress(&goal_with(&[], &[])), 0);
    }

    #[test]
    fn create_user_rejects_duplicates_without_touching_snapshot() {
        let mut snapshot = snapshot_with_user("ana");
        let before = snapshot.clone();
        let err = create_user(&mut snapshot, "ana", "other").unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyExists(_)));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn create_user_requires_a_name() {
        let mut snapshot = Snapshot::default();
        let err = create_user(&mut snapshot, "   ", "pw").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert!(snapshot.users.is_empty());
    }

    #[test]
    fn passwords_are_salted_and_verified() {
        let mut snapshot = Snapshot::default();
        let a = create_user(&mut snapshot, "ana", "same").unwrap();
        let b = create_user(&mut snapshot, "bia", "same").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.password_hash, b.password_hash);
        assert_ne!(a.password_hash, "same");

        assert!(verify_user(&snapshot, "ana", "same"));
        assert!(!verify_user(&snapshot, "ana", "wrong"));
        assert!(!verify_user(&snapshot, "nobody", "same"));
    }

    #[test]
    fn weighted_scenario_reaches_seventy_five() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Learn Rust", None).unwrap();
        add_subgoal(&mut snapshot, "ana", &goal.id, "book", Some(1), None).unwrap();
        add_subgoal(&mut snapshot, "ana", &goal.id, "exercises", None, None).unwrap();
        let goal = add_subgoal(&mut snapshot, "ana", &goal.id, "project", Some(2), None).unwrap();
        assert_eq!(goal.sub_goals.len(), 3);

        let ids: Vec<String> = goal.sub_goals.iter().map(|sub| sub.id.clone()).collect();
        toggle_subgoal(&mut snapshot, "ana", &goal.id, &ids[0], true).unwrap();
        let updated = toggle_subgoal(&mut snapshot, "ana", &goal.id, &ids[2], true).unwrap();
        assert_eq!(updated.progress, 75);
        assert_eq!(find_goal(&snapshot, "ana", &goal.id).unwrap().progress, 75);
    }

    #[test]
    fn toggling_twice_to_same_value_is_idempotent() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Run", None).unwrap();
        let with_sub = add_subgoal(&mut snapshot, "ana", &goal.id, "5k", Some(3), None).unwrap();
        add_subgoal(&mut snapshot, "ana", &goal.id, "10k", Some(1), None).unwrap();
        let sub_id = with_sub.sub_goals[0].id.clone();

        let first = toggle_subgoal(&mut snapshot, "ana", &goal.id, &sub_id, true).unwrap();
        let second = toggle_subgoal(&mut snapshot, "ana", &goal.id, &sub_id, true).unwrap();
        assert_eq!(first.progress, 75);
        assert_eq!(first, second);
    }

    #[test]
    fn points_are_coerced_to_at_least_one() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Save", None).unwrap();
        for points in [None, Some(0), Some(-4)] {
            add_subgoal(&mut snapshot, "ana", &goal.id, "step", points, None).unwrap();
        }
        let goal = find_goal(&snapshot, "ana", &goal.id).unwrap();
        assert!(goal.sub_goals.iter().all(|sub| sub.points == 1));
    }

    #[test]
    fn empty_titles_are_rejected() {
        let mut snapshot = snapshot_with_user("ana");
        assert!(matches!(
            add_goal(&mut snapshot, "ana", "  ", None),
            Err(LedgerError::InvalidInput(_))
        ));
        let goal = add_goal(&mut snapshot, "ana", "Write", None).unwrap();
        assert!(matches!(
            add_subgoal(&mut snapshot, "ana", &goal.id, "", Some(2), None),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(find_goal(&snapshot, "ana", &goal.id).unwrap().sub_goals.is_empty());
    }

    #[test]
    fn deleting_a_goal_cascades_to_subgoals() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Move", None).unwrap();
        let goal = add_subgoal(&mut snapshot, "ana", &goal.id, "pack", None, None).unwrap();
        let sub_id = goal.sub_goals[0].id.clone();

        let removed = delete_goal(&mut snapshot, "ana", &goal.id).unwrap();
        assert_eq!(removed.sub_goals.len(), 1);
        assert!(matches!(
            find_subgoal(&snapshot, "ana", &goal.id, &sub_id),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            delete_goal(&mut snapshot, "ana", &goal.id),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn deleting_a_subgoal_recomputes_progress() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Cook", None).unwrap();
        let goal = add_subgoal(&mut snapshot, "ana", &goal.id, "shop", Some(1), None).unwrap();
        let goal = add_subgoal(&mut snapshot, "ana", &goal.id, "bake", Some(1), None).unwrap();
        let (shop, bake) = (goal.sub_goals[0].id.clone(), goal.sub_goals[1].id.clone());
        toggle_subgoal(&mut snapshot, "ana", &goal.id, &shop, true).unwrap();

        let updated = delete_subgoal(&mut snapshot, "ana", &goal.id, &bake).unwrap();
        assert_eq!(updated.progress, 100);
        let updated = delete_subgoal(&mut snapshot, "ana", &goal.id, &shop).unwrap();
        assert_eq!(updated.progress, 0);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut snapshot = snapshot_with_user("ana");
        assert!(matches!(
            add_goal(&mut snapshot, "ghost", "x", None),
            Err(LedgerError::NotFound(_))
        ));
        let goal = add_goal(&mut snapshot, "ana", "Paint", None).unwrap();
        assert!(matches!(
            toggle_subgoal(&mut snapshot, "ana", &goal.id, "missing", true),
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            add_subgoal(&mut snapshot, "ana", "missing", "x", None, None),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn goals_are_scoped_to_their_owner() {
        let mut snapshot = snapshot_with_user("ana");
        create_user(&mut snapshot, "bia", "pw").unwrap();
        let goal = add_goal(&mut snapshot, "ana", "Private", None).unwrap();
        assert!(matches!(
            delete_goal(&mut snapshot, "bia", &goal.id),
            Err(LedgerError::NotFound(_))
        ));
        assert_eq!(goals(&snapshot, "ana").unwrap().len(), 1);
        assert!(goals(&snapshot, "bia").unwrap().is_empty());
    }

    #[test]
    fn import_replaces_tree_and_recomputes_progress() {
        let mut snapshot = snapshot_with_user("ana");
        add_goal(&mut snapshot, "ana", "Old", None).unwrap();
        let mut backup = export_goals(&snapshot, "ana").unwrap();
        backup.goals = vec![Goal {
            progress: 3,
            ..goal_with(&[0, 1, 2], &[true, false, true])
        }];

        let goals = import_goals(&mut snapshot, "ana", backup).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].sub_goals[0].points, 1);
        assert_eq!(goals[0].progress, 75);
    }

    #[test]
    fn import_from_json_treats_missing_or_non_positive_points_as_one() {
        let mut snapshot = snapshot_with_user("ana");
        let raw = r#"{
            "username": "ana",
            "exported_at": "2026-01-05T10:00:00Z",
            "goals": [{"id": "g1", "title": "Garden", "due": null, "submetas": [
                {"id": "s1", "title": "dig", "done": true, "due": null},
                {"id": "s2", "title": "seed", "points": 0, "done": false, "due": null},
                {"id": "s3", "title": "water", "points": -3, "done": true, "due": null},
                {"id": "s4", "title": "harvest", "points": 1, "done": false, "due": null}
            ]}]
        }"#;
        let backup: GoalExport = serde_json::from_str(raw).unwrap();

        let goals = import_goals(&mut snapshot, "ana", backup).unwrap();
        assert!(goals[0].sub_goals.iter().all(|sub| sub.points == 1));
        assert_eq!(goals[0].progress, 50);
    }

    #[test]
    fn import_rejects_duplicate_ids_and_keeps_existing_tree() {
        let mut snapshot = snapshot_with_user("ana");
        add_goal(&mut snapshot, "ana", "Keep me", None).unwrap();
        let before = snapshot.clone();
        let mut backup = export_goals(&snapshot, "ana").unwrap();
        backup.goals = vec![goal_with(&[1], &[false]), goal_with(&[1], &[true])];

        let err = import_goals(&mut snapshot, "ana", backup).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));
        assert_eq!(snapshot, before);
    }

    #[test]
    fn export_carries_the_full_tree() {
        let mut snapshot = snapshot_with_user("ana");
        let goal = add_goal(&mut snapshot, "ana", "Trip", NaiveDate::from_ymd_opt(2026, 8, 1)).unwrap();
        add_subgoal(&mut snapshot, "ana", &goal.id, "tickets", Some(2), None).unwrap();

        let backup = export_goals(&snapshot, "ana").unwrap();
        assert_eq!(backup.username, "ana");
        assert_eq!(backup.goals, goals(&snapshot, "ana").unwrap());
    }
}
