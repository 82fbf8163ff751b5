//! Expression compiler for the sled store
//!
//! Top-level conjuncts the reverse indices can answer exactly (`IdIn`, `TagEq`,
//! `TagHoldsAll`) are resolved into a candidate id set; everything else stays
//! in a residual expression evaluated per candidate record. Without an
//! index-resolvable conjunct every record is scanned.

use super::{Database, Result};
use crate::query::Expr;
use crate::record::{Record, RecordId};
use std::collections::BTreeSet;

/// Index-assisted scan plan
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// `None` means scan every record
    pub candidates: Option<BTreeSet<RecordId>>,
    pub residual: Expr,
}

impl QueryPlan {
    /// Split `expr` into index lookups and a residual filter
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an index lookup fails.
    pub fn compile(db: &Database, expr: &Expr) -> Result<Self> {
        let conjuncts: Vec<&Expr> = match expr {
            Expr::And(parts) => parts.iter().collect(),
            other => vec![other],
        };

        let mut candidates: Option<BTreeSet<RecordId>> = None;
        let mut residual = Vec::new();

        for conjunct in conjuncts {
            let hits = match conjunct {
                Expr::False => Some(BTreeSet::new()),
                Expr::IdIn(ids) => Some(ids.clone()),
                Expr::TagEq(tag, value) => Some(db.find_by_tag(tag, value)?),
                Expr::TagHoldsAll(tag, values) if !values.is_empty() => {
                    Some(db.find_by_all_values(tag, values)?)
                }
                other => {
                    residual.push(other.clone());
                    None
                }
            };
            if let Some(hits) = hits {
                candidates = Some(match candidates {
                    Some(current) => current.intersection(&hits).copied().collect(),
                    None => hits,
                });
            }
        }

        Ok(Self {
            candidates,
            residual: Expr::and(residual),
        })
    }

    /// Whether the plan is known to select nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.residual == Expr::False || self.candidates.as_ref().is_some_and(BTreeSet::is_empty)
    }
}

impl Database {
    /// Records matching `expr`, in identifier order
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an index lookup, iteration or decode fails.
    pub fn select(&self, expr: &Expr) -> Result<Vec<Record>> {
        let plan = QueryPlan::compile(self, expr)?;
        tracing::debug!(
            filter = %expr,
            candidates = ?plan.candidates.as_ref().map(BTreeSet::len),
            residual = %plan.residual,
            "compiled query plan"
        );
        if plan.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        match &plan.candidates {
            Some(ids) => {
                for &id in ids {
                    if let Some(record) = self.get(id)?
                        && plan.residual.matches(&record)
                    {
                        records.push(record);
                    }
                }
            }
            None => {
                for record in self.list_all()? {
                    if plan.residual.matches(&record) {
                        records.push(record);
                    }
                }
            }
        }
        Ok(records)
    }
}
