//! Reconciliation of nested child collections.
//!
//! When a patch carries a child collection, the collection's final membership is exactly
//! the set of children listed in the patch:
//!
//! - an incoming child whose natural key matches an existing child updates it in place;
//! - failing that, an incoming child whose `id` names an existing child of the same parent
//!   updates it (this is how a child gets renamed);
//! - an unmatched incoming child is inserted;
//! - every existing child left unmatched is **deleted**.
//!
//! Omitting a child from the payload therefore deletes it server-side. The collection is
//! only reconciled when the field is present in the patch at all.

use crate::framework::delta::Delta;
use crate::framework::error::ApiError;
use crate::framework::record::{ChildRecord, RecordId};
use std::collections::HashSet;

/// Store writes needed to bring a child collection in line with a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan<C> {
    pub updates: Vec<C>,
    pub inserts: Vec<C>,
    pub deletes: Vec<C>,
}

impl<C> ReconcilePlan<C> {
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.inserts.is_empty() && self.deletes.is_empty()
    }
}

/// Compute the plan for `existing` children of `parent_id` against `incoming` patches.
///
/// Pure: nothing is written. Inserts carry id 0 so the store assigns one.
///
/// # Errors
/// [`ApiError::InvalidDelta`] when an incoming child repeats a natural key, when a child
/// to be inserted has no natural key, or when a field fails to merge.
pub fn reconcile<C: ChildRecord>(
    parent_id: RecordId,
    existing: Vec<C>,
    incoming: &[Delta],
) -> Result<ReconcilePlan<C>, ApiError> {
    let schema = C::schema();
    let mut seen = HashSet::new();
    for (index, delta) in incoming.iter().enumerate() {
        if let Some(key) = delta.get::<String>(C::KEY_FIELD) {
            if !seen.insert(key) {
                return Err(ApiError::invalid_delta(C::KEY_FIELD, "duplicate natural key")
                    .within(&format!("[{index}]")));
            }
        }
    }

    let mut remaining: Vec<Option<C>> = existing.into_iter().map(Some).collect();
    let mut updates = Vec::new();
    let mut inserts = Vec::new();

    for (index, delta) in incoming.iter().enumerate() {
        let path = format!("[{index}]");
        let key = delta.get::<String>(C::KEY_FIELD);

        let by_key = key.as_deref().and_then(|key| {
            remaining
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|c| c.natural_key() == key))
        });
        let slot = by_key.or_else(|| {
            delta.id().and_then(|id| {
                remaining
                    .iter()
                    .position(|slot| {
                        slot.as_ref()
                            .is_some_and(|c| c.id() == id && c.parent_id() == parent_id)
                    })
            })
        });

        match slot.and_then(|ix| remaining[ix].take()) {
            Some(mut child) => {
                delta.merge(&mut child, schema).map_err(|e| e.within(&path))?;
                child.set_parent_id(parent_id);
                updates.push(child);
            }
            None => {
                if key.is_none() {
                    return Err(ApiError::invalid_delta(C::KEY_FIELD, "required").within(&path));
                }
                let mut child = C::default();
                delta.merge(&mut child, schema).map_err(|e| e.within(&path))?;
                child.set_id(0);
                child.set_parent_id(parent_id);
                inserts.push(child);
            }
        }
    }

    Ok(ReconcilePlan {
        updates,
        inserts,
        deletes: remaining.into_iter().flatten().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::Resource;
    use crate::model::SpecificationAttributeOption;
    use serde_json::json;

    fn option(id: RecordId, name: &str) -> SpecificationAttributeOption {
        SpecificationAttributeOption {
            id,
            specification_attribute_id: 1,
            name: name.into(),
            display_order: id,
            ..Default::default()
        }
    }

    fn patches(value: serde_json::Value) -> Vec<Delta> {
        Delta::parse_list(&value, SpecificationAttributeOption::schema()).unwrap()
    }

    fn names(options: &[SpecificationAttributeOption]) -> Vec<&str> {
        options.iter().map(|o| o.name.as_str()).collect()
    }

    #[test]
    fn absent_children_are_deleted_and_renames_match_by_id() {
        let existing = vec![option(1, "A"), option(2, "B"), option(3, "C")];
        let incoming = patches(json!([
            { "id": 1, "name": "A-renamed" },
            { "name": "C" }
        ]));

        let plan = reconcile(1, existing, &incoming).unwrap();

        assert_eq!(names(&plan.updates), ["A-renamed", "C"]);
        assert_eq!(plan.updates[0].id, 1);
        assert!(plan.inserts.is_empty());
        assert_eq!(names(&plan.deletes), ["B"]);
    }

    #[test]
    fn id_fallback_ignores_children_of_another_parent() {
        let mut foreign = option(5, "X");
        foreign.specification_attribute_id = 2;
        let incoming = patches(json!([{ "id": 5, "name": "Y" }]));

        let plan = reconcile(1, vec![foreign], &incoming).unwrap();

        assert!(plan.updates.is_empty());
        assert_eq!(names(&plan.inserts), ["Y"]);
        assert_eq!(plan.inserts[0].id, 0);
    }

    #[test]
    fn unmatched_children_are_inserted_under_the_parent() {
        let incoming = patches(json!([{ "name": "New", "display_order": 4 }]));

        let plan = reconcile(7, vec![option(1, "Old")], &incoming).unwrap();

        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.inserts[0].id, 0);
        assert_eq!(plan.inserts[0].specification_attribute_id, 7);
        assert_eq!(plan.inserts[0].display_order, 4);
        assert_eq!(names(&plan.deletes), ["Old"]);
    }

    #[test]
    fn matched_children_follow_the_presence_rule() {
        let mut existing = option(2, "Red");
        existing.color_squares_rgb = Some("#ff0000".into());
        let incoming = patches(json!([{ "name": "Red", "display_order": 10 }]));

        let plan = reconcile(1, vec![existing], &incoming).unwrap();

        assert_eq!(plan.updates[0].display_order, 10);
        assert_eq!(plan.updates[0].color_squares_rgb.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn empty_collection_deletes_everything() {
        let plan = reconcile(1, vec![option(1, "A"), option(2, "B")], &[]).unwrap();
        assert!(plan.updates.is_empty() && plan.inserts.is_empty());
        assert_eq!(plan.deletes.len(), 2);
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let incoming = patches(json!([{ "name": "A" }, { "name": "A" }]));
        let err = reconcile::<SpecificationAttributeOption>(1, vec![], &incoming).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("[1].name", "duplicate natural key"));
    }

    #[test]
    fn inserts_need_a_natural_key() {
        let incoming = patches(json!([{ "display_order": 3 }]));
        let err = reconcile::<SpecificationAttributeOption>(1, vec![], &incoming).unwrap_err();
        assert_eq!(err, ApiError::invalid_delta("[0].name", "required"));
    }

    #[test]
    fn identical_payload_is_update_only() {
        let existing = vec![option(1, "A"), option(2, "B")];
        let incoming = patches(json!([{ "name": "A" }, { "name": "B" }]));
        let plan = reconcile(1, existing.clone(), &incoming).unwrap();
        assert_eq!(plan.updates, existing);
        assert!(plan.deletes.is_empty());
        assert!(!plan.is_noop());
    }
}
