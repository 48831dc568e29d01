// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use time::Date;

use crate::{FieldKey, ItemColumn, OrderForm, Record, RecordId, RecordKind, Totals};

/// Edits an editing surface can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    AddRow,
    RemoveRow(usize),
    EditCell {
        row: usize,
        column: ItemColumn,
        value: String,
    },
    SetField {
        key: FieldKey,
        value: String,
    },
    SetPoDate(Date),
    ApplyRecord(Record),
}

/// A row that moved after a removal. The surface must rebind its remove
/// action from `previous` to `current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBinding {
    pub previous: usize,
    pub current: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    RowAdded(usize),
    RowRemoved(usize),
    RowsReindexed(Vec<RowBinding>),
    CellEdited { row: usize, column: ItemColumn },
    TotalsRecalculated(Totals),
    FieldChanged(FieldKey),
    RecordApplied { kind: RecordKind, id: RecordId },
}

impl OrderForm {
    pub fn dispatch(&mut self, command: FormCommand) -> Result<Vec<FormEvent>> {
        match command {
            FormCommand::AddRow => Ok(vec![FormEvent::RowAdded(self.add_row())]),
            FormCommand::RemoveRow(row) => {
                let (_, totals) = self.remove_row(row)?;
                let bindings = (row..self.items().len())
                    .map(|current| RowBinding {
                        previous: current + 1,
                        current,
                    })
                    .collect();
                Ok(vec![
                    FormEvent::RowRemoved(row),
                    FormEvent::RowsReindexed(bindings),
                    FormEvent::TotalsRecalculated(totals),
                ])
            }
            FormCommand::EditCell { row, column, value } => {
                let mut events = vec![FormEvent::CellEdited { row, column }];
                if let Some(totals) = self.edit_cell(row, column, &value)? {
                    events.push(FormEvent::TotalsRecalculated(totals));
                }
                Ok(events)
            }
            FormCommand::SetField { key, value } => {
                self.set_field(key, &value)?;
                Ok(vec![FormEvent::FieldChanged(key)])
            }
            FormCommand::SetPoDate(date) => {
                self.set_po_date(date);
                Ok(vec![FormEvent::FieldChanged(FieldKey::PoDate)])
            }
            FormCommand::ApplyRecord(record) => {
                self.apply_record(&record);
                Ok(vec![FormEvent::RecordApplied {
                    kind: record.kind,
                    id: record.id,
                }])
            }
        }
    }
}
