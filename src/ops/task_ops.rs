//! Pure operations over the task collection.
//!
//! Every mutation takes the current sequence by reference and returns a new
//! one. Tasks that don't change are cloned as-is; the changed task is rebuilt.
//! Unknown ids and blank titles are silent no-ops: the result equals the input.

use std::collections::HashSet;

use chrono::Utc;

use crate::model::task::{Filter, Progress, Task};

// ---------------------------------------------------------------------------
// Id generation
// ---------------------------------------------------------------------------

/// Hands out task ids of the form `<unix-millis>` or `<unix-millis>-<seq>`.
///
/// Several ids requested within the same millisecond get increasing `seq`
/// suffixes. If the clock goes backwards the generator stays on the last tick
/// it saw, so ids keep increasing. Every candidate is also checked against the
/// ids already present in the collection.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_tick: i64,
    seq: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an id not used by any task in `existing`
    pub fn next_id(&mut self, existing: &[Task]) -> String {
        self.next_id_at(Utc::now().timestamp_millis(), existing)
    }

    fn next_id_at(&mut self, now_ms: i64, existing: &[Task]) -> String {
        if now_ms > self.last_tick {
            self.last_tick = now_ms;
            self.seq = 0;
        } else {
            self.seq += 1;
        }
        loop {
            let candidate = if self.seq == 0 {
                self.last_tick.to_string()
            } else {
                format!("{}-{}", self.last_tick, self.seq)
            };
            if !existing.iter().any(|t| t.id == candidate) {
                return candidate;
            }
            self.seq += 1;
        }
    }
}

/// Trim a title, returning None if nothing is left
pub fn normalize_title(title: &str) -> Option<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Append a new open task with a fresh id
pub fn add(tasks: &[Task], title: &str, ids: &mut IdGenerator) -> Vec<Task> {
    let Some(title) = normalize_title(title) else {
        return tasks.to_vec();
    };
    let id = ids.next_id(tasks);
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(Task::new(id, title.to_string()));
    next
}

/// Flip `completed` on the task with this id
pub fn toggle(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if t.id == id {
                Task {
                    completed: !t.completed,
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Replace the title of the task with this id. Blank titles are rejected.
pub fn update(tasks: &[Task], id: &str, new_title: &str) -> Vec<Task> {
    let Some(title) = normalize_title(new_title) else {
        return tasks.to_vec();
    };
    tasks
        .iter()
        .map(|t| {
            if t.id == id {
                Task {
                    title: title.to_string(),
                    ..t.clone()
                }
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Remove the task with this id
pub fn delete(tasks: &[Task], id: &str) -> Vec<Task> {
    tasks.iter().filter(|t| t.id != id).cloned().collect()
}

/// Delete behind a confirmation gate. `confirm` sees the task about to go and
/// only runs if it exists. Returns None when nothing was removed.
pub fn delete_if(
    tasks: &[Task],
    id: &str,
    confirm: impl FnOnce(&Task) -> bool,
) -> Option<Vec<Task>> {
    let task = find_task(tasks, id)?;
    if !confirm(task) {
        return None;
    }
    Some(delete(tasks, id))
}

/// Give every task whose id already appeared earlier in the list a fresh id.
/// Lists written by other clients can carry same-millisecond collisions.
pub fn dedupe_ids(tasks: &[Task], ids: &mut IdGenerator) -> Vec<Task> {
    let mut seen: HashSet<&str> = HashSet::new();
    tasks
        .iter()
        .map(|t| {
            if seen.insert(t.id.as_str()) {
                t.clone()
            } else {
                Task {
                    id: ids.next_id(tasks),
                    ..t.clone()
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

/// Lazily yield the tasks visible under `filter`, in collection order
pub fn filter(tasks: &[Task], filter: Filter) -> impl Iterator<Item = &Task> + Clone {
    tasks.iter().filter(move |t| filter.matches(t))
}

/// Count tasks and compute the rounded completion percentage
pub fn progress(tasks: &[Task]) -> Progress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let percentage = if total == 0 {
        0
    } else {
        // round(completed / total * 100), halves rounded up
        ((completed * 200 + total) / (total * 2)) as u8
    };
    Progress {
        total,
        completed,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            completed,
        }
    }

    fn sample() -> Vec<Task> {
        vec![t("1", "A", false), t("2", "B", true), t("3", "C", false)]
    }

    // -- ids --

    #[test]
    fn ids_within_one_tick_get_suffixes() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(1000, &[]), "1000");
        assert_eq!(ids.next_id_at(1000, &[]), "1000-1");
        assert_eq!(ids.next_id_at(1000, &[]), "1000-2");
        assert_eq!(ids.next_id_at(1001, &[]), "1001");
    }

    #[test]
    fn ids_survive_clock_going_backwards() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(2000, &[]), "2000");
        assert_eq!(ids.next_id_at(1500, &[]), "2000-1");
    }

    #[test]
    fn ids_skip_existing() {
        let existing = vec![t("5000", "x", false), t("5000-1", "y", false)];
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id_at(5000, &existing), "5000-2");
    }

    #[test]
    fn rapid_adds_never_collide() {
        let mut ids = IdGenerator::new();
        let mut tasks = Vec::new();
        for i in 0..200 {
            tasks = add(&tasks, &format!("task {}", i), &mut ids);
        }
        let mut seen: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 200);
    }

    // -- add --

    #[test]
    fn add_appends_trimmed_open_task() {
        let before = sample();
        let mut ids = IdGenerator::new();
        let after = add(&before, "  Walk dog \n", &mut ids);
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..3], &before[..]);
        let last = after.last().unwrap();
        assert_eq!(last.title, "Walk dog");
        assert!(!last.completed);
        assert!(!before.iter().any(|t| t.id == last.id));
    }

    #[test]
    fn add_blank_is_noop() {
        let before = sample();
        let mut ids = IdGenerator::new();
        assert_eq!(add(&before, "", &mut ids), before);
        assert_eq!(add(&before, "   \t ", &mut ids), before);
    }

    // -- toggle --

    #[test]
    fn toggle_flips_only_target() {
        let after = toggle(&sample(), "1");
        assert!(after[0].completed);
        assert!(after[1].completed);
        assert!(!after[2].completed);
    }

    #[test]
    fn double_toggle_is_identity() {
        let s = sample();
        for task in &s {
            assert_eq!(toggle(&toggle(&s, &task.id), &task.id), s);
        }
    }

    // -- update --

    #[test]
    fn update_replaces_title_keeps_completed() {
        let after = update(&sample(), "2", "  Beta ");
        assert_eq!(after[1], t("2", "Beta", true));
        assert_eq!(after[0], sample()[0]);
    }

    #[test]
    fn update_blank_is_rejected() {
        let s = sample();
        assert_eq!(update(&s, "2", ""), s);
        assert_eq!(update(&s, "2", "   "), s);
    }

    // -- delete --

    #[test]
    fn delete_removes_one_and_keeps_order() {
        let after = delete(&sample(), "2");
        assert_eq!(after, vec![t("1", "A", false), t("3", "C", false)]);
    }

    #[test]
    fn delete_if_consults_the_gate() {
        let s = sample();
        assert_eq!(delete_if(&s, "2", |_| false), None);
        assert_eq!(delete_if(&s, "nope", |_| panic!("no task, no question")), None);
        let after = delete_if(&s, "2", |t| t.title == "B").unwrap();
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn duplicate_ids_are_reissued() {
        let s = vec![
            t("1717", "A", false),
            t("1717", "B", true),
            t("9", "C", false),
            t("1717", "D", false),
        ];
        let mut ids = IdGenerator::new();
        let fixed = dedupe_ids(&s, &mut ids);

        let titles: Vec<&str> = fixed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
        assert_eq!(fixed[0].id, "1717");
        assert_eq!(fixed[2].id, "9");
        assert!(fixed[1].completed);

        let unique: HashSet<&str> = fixed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(unique.len(), 4);

        // Delete and toggle now touch exactly one task
        assert_eq!(delete(&fixed, "1717").len(), 3);
        let toggled = toggle(&fixed, "1717");
        assert_eq!(toggled.iter().filter(|t| t.completed).count(), 2);
    }

    #[test]
    fn dedupe_leaves_unique_lists_alone() {
        let s = sample();
        assert_eq!(dedupe_ids(&s, &mut IdGenerator::new()), s);
    }

    #[test]
    fn unknown_id_is_noop_everywhere() {
        let s = sample();
        assert_eq!(toggle(&s, "nope"), s);
        assert_eq!(delete(&s, "nope"), s);
        assert_eq!(update(&s, "nope", "anything"), s);
    }

    // -- filter / progress --

    #[test]
    fn filter_preserves_order_and_restarts() {
        let s = sample();
        let active = filter(&s, Filter::Active);
        let ids: Vec<&str> = active.clone().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        // Restartable: a second pass sees the same items
        assert_eq!(active.count(), 2);
        assert_eq!(filter(&s, Filter::All).count(), 3);
        let done: Vec<&Task> = filter(&s, Filter::Completed).collect();
        assert_eq!(done, vec![&s[1]]);
    }

    #[test]
    fn progress_empty() {
        assert_eq!(
            progress(&[]),
            Progress {
                total: 0,
                completed: 0,
                percentage: 0
            }
        );
    }

    #[test]
    fn progress_two_of_three() {
        let s = vec![t("1", "a", true), t("2", "b", false), t("3", "c", true)];
        assert_eq!(
            progress(&s),
            Progress {
                total: 3,
                completed: 2,
                percentage: 67
            }
        );
    }

    #[test]
    fn progress_rounds_half_up() {
        // 1/8 = 12.5%
        let mut s: Vec<Task> = (0..8).map(|i| t(&i.to_string(), "x", false)).collect();
        s[0].completed = true;
        assert_eq!(progress(&s).percentage, 13);
        // 1/3 = 33.33%
        assert_eq!(progress(&s[..3]).percentage, 33);
        s.iter_mut().for_each(|t| t.completed = true);
        assert_eq!(progress(&s).percentage, 100);
    }

    // -- scenarios --

    #[test]
    fn scenario_buy_milk() {
        let mut ids = IdGenerator::new();
        let s = add(&[], "Buy milk", &mut ids);
        let s = add(&s, "  ", &mut ids);
        assert_eq!(s.len(), 1);
        let id = s[0].id.clone();
        let s = toggle(&s, &id);

        let done: Vec<&Task> = filter(&s, Filter::Completed).collect();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "Buy milk");
        assert!(done[0].completed);
        assert_eq!(filter(&s, Filter::Active).count(), 0);
    }

    #[test]
    fn scenario_delete_first_of_two() {
        let mut ids = IdGenerator::new();
        let s = add(&[], "A", &mut ids);
        let s = add(&s, "B", &mut ids);
        let a = s[0].id.clone();
        let b = s[1].clone();
        let s = delete(&s, &a);
        assert_eq!(s, vec![b.clone()]);

        let s2 = update(&s, &b.id, "");
        assert_eq!(s2, s);
        assert_eq!(s2[0].title, "B");
    }
}
