use chrono::{DateTime, Utc};

use super::traits::{Action, BoxedAction, BoxedCondition, Condition};
use crate::common::errors::Result;
use crate::common::types::{Snapshot, WatchId};

/// A condition/action pair registered under an id
pub struct Watch {
    id: WatchId,
    condition: BoxedCondition,
    action: BoxedAction,
    created_at: DateTime<Utc>,
}

impl Watch {
    pub fn new(
        id: WatchId,
        condition: impl Condition + 'static,
        action: impl Action + 'static,
    ) -> Self {
        Self::from_boxed(id, Box::new(condition), Box::new(action))
    }

    pub fn from_boxed(id: WatchId, condition: BoxedCondition, action: BoxedAction) -> Self {
        Self {
            id,
            condition,
            action,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn check(&self, snapshot: &Snapshot) -> bool {
        self.condition.check(snapshot)
    }

    pub async fn perform(&self, snapshot: &Snapshot) -> Result<()> {
        self.action.perform(snapshot).await
    }
}

impl std::fmt::Debug for Watch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watch")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
