use chrono::NaiveDateTime;
use dashmap::DashMap;
use uuid::Uuid;

use crate::core::error::CodeError;
use crate::models::code::Code;
use crate::wal::wal::{Wal, WalOperation};

/// In-memory ledger of issued QR codes and their usage state.
pub struct CodeLedger {
    codes: DashMap<String, Code>,
}

impl CodeLedger {
    pub fn new() -> Self {
        Self {
            codes: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            codes: DashMap::with_capacity(capacity),
        }
    }

    /// Add an issued code from the directory backend.
    ///
    /// A spent entry is never un-spent: if the ledger already holds the
    /// code as used, the incoming row keeps those usage flags.
    pub fn add_code(&self, code: Code) {
        match self.codes.entry(code.code.clone()) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                if entry.get().used {
                    let mut merged = code;
                    merged.used = true;
                    merged.used_at = entry.get().used_at;
                    entry.insert(merged);
                } else {
                    entry.insert(code);
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(code);
            }
        }
    }

    /// Look a code up. No side effects; absence is a value.
    pub fn lookup(&self, code: &str) -> Option<Code> {
        self.codes.get(code).map(|entry| entry.value().clone())
    }

    /// Flip a code to used, logging the mutation to the WAL first so a
    /// spent code stays spent across restarts.
    ///
    /// Only call this once the scan outcome is final for the code.
    pub fn consume(&self, wal: &Wal, code: &str, now: NaiveDateTime) -> Result<Code, CodeError> {
        if !self.codes.contains_key(code) {
            return Err(CodeError::NotFound);
        }

        wal.log_operation(WalOperation::CodeUsed {
            code: code.to_string(),
            used_at: now,
        })
        .map_err(CodeError::Store)?;

        let mut entry = self.codes.get_mut(code).ok_or(CodeError::NotFound)?;
        entry.used = true;
        entry.used_at = Some(now);
        Ok(entry.value().clone())
    }

    /// Replay path: mark a code used without touching the WAL. Codes the
    /// directory no longer reports get a tombstone so the single-use
    /// guarantee survives directory churn.
    pub fn restore_used(&self, code: &str, used_at: NaiveDateTime) {
        match self.codes.get_mut(code) {
            Some(mut entry) => {
                entry.used = true;
                entry.used_at = Some(used_at);
            }
            None => {
                let mut tombstone = Code::new(code, Uuid::nil());
                tombstone.used = true;
                tombstone.used_at = Some(used_at);
                self.codes.insert(code.to_string(), tombstone);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn used_count(&self) -> usize {
        self.codes.iter().filter(|entry| entry.value().used).count()
    }
}

impl Default for CodeLedger {
    fn default() -> Self {
        Self::new()
    }
}
