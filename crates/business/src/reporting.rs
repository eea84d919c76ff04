//! Reporting projection
//!
//! Read-only view of every ledger entry for the report writer.

use crate::error::{BankError, BankResult};
use crate::services::ServiceContext;
use tellerbank_core::TransactionReport;
use tellerbank_persistence::ReportRepo;

pub struct Reporting<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> Reporting<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All transactions with account and holder, oldest first
    pub async fn list_all_transactions(&self) -> BankResult<Vec<TransactionReport>> {
        self.ctx
            .bounded(async {
                let rows = ReportRepo::all_transactions(self.ctx.pool()).await?;
                tracing::debug!(rows = rows.len(), "report projection loaded");
                rows.into_iter()
                    .map(|row| TransactionReport::try_from(row).map_err(BankError::from))
                    .collect()
            })
            .await
    }
}
