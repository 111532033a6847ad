#![forbid(unsafe_code)]

use super::{ElectiveChoice, ElectiveChoicesRow, SqliteStore, StoreError, canonical_id};
use rusqlite::{OptionalExtension, Transaction, params};
use serde_json::{Value, json};

impl SqliteStore {
    /// Add-to-set semantics: the (elective, batch) pair is appended to the
    /// student's embedded list only if not already present. Returns whether
    /// the list changed.
    pub fn add_elective_choice(
        &mut self,
        student_id: &str,
        elective_code: &str,
        batch: i64,
    ) -> Result<bool, StoreError> {
        let student_id = canonical_id(student_id, "invalid student id")?;
        let elective_code = canonical_id(elective_code, "invalid elective code")?;

        let tx = self.conn_mut().transaction()?;
        let mut choices = choices_tx(&tx, &student_id)?.unwrap_or_default();

        let already = choices
            .iter()
            .any(|choice| choice.elective_code == elective_code && choice.batch == batch);
        if already {
            tx.commit()?;
            return Ok(false);
        }

        choices.push(ElectiveChoice {
            elective_code,
            batch,
        });
        write_choices_tx(&tx, &student_id, &choices)?;

        tx.commit()?;
        Ok(true)
    }

    pub fn list_elective_choices(&self) -> Result<Vec<ElectiveChoicesRow>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT student_id, electives_json FROM elective_student_assignments \
             ORDER BY student_id ASC",
        )?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let student_id: String = row.get(0)?;
            let raw: String = row.get(1)?;
            out.push(ElectiveChoicesRow {
                student_id,
                electives: decode_choices(&raw)?,
            });
        }
        Ok(out)
    }

    pub fn elective_choices_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<ElectiveChoice>, StoreError> {
        let raw = self
            .conn()
            .query_row(
                "SELECT electives_json FROM elective_student_assignments WHERE student_id=?1",
                params![student_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        match raw {
            Some(raw) => decode_choices(&raw),
            None => Ok(Vec::new()),
        }
    }

    pub fn update_elective_choice(
        &mut self,
        student_id: &str,
        elective_code: &str,
        new_batch: Option<i64>,
        new_elective_code: Option<String>,
    ) -> Result<(), StoreError> {
        let tx = self.conn_mut().transaction()?;

        let Some(mut choices) = choices_tx(&tx, student_id)? else {
            return Err(StoreError::UnknownId);
        };
        let Some(choice) = choices
            .iter_mut()
            .find(|choice| choice.elective_code == elective_code)
        else {
            return Err(StoreError::UnknownId);
        };

        if let Some(batch) = new_batch {
            choice.batch = batch;
        }
        if let Some(code) = new_elective_code {
            choice.elective_code = canonical_id(&code, "invalid elective code")?;
        }
        write_choices_tx(&tx, student_id, &choices)?;

        tx.commit()?;
        Ok(())
    }

    pub fn remove_elective_choice(
        &mut self,
        student_id: &str,
        elective_code: &str,
    ) -> Result<(), StoreError> {
        let tx = self.conn_mut().transaction()?;

        let Some(choices) = choices_tx(&tx, student_id)? else {
            return Err(StoreError::UnknownId);
        };
        let remaining: Vec<ElectiveChoice> = choices
            .iter()
            .filter(|choice| choice.elective_code != elective_code)
            .cloned()
            .collect();
        if remaining.len() == choices.len() {
            return Err(StoreError::UnknownId);
        }
        write_choices_tx(&tx, student_id, &remaining)?;

        tx.commit()?;
        Ok(())
    }
}

fn choices_tx(
    tx: &Transaction<'_>,
    student_id: &str,
) -> Result<Option<Vec<ElectiveChoice>>, StoreError> {
    let raw = tx
        .query_row(
            "SELECT electives_json FROM elective_student_assignments WHERE student_id=?1",
            params![student_id],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match raw {
        Some(raw) => Ok(Some(decode_choices(&raw)?)),
        None => Ok(None),
    }
}

fn write_choices_tx(
    tx: &Transaction<'_>,
    student_id: &str,
    choices: &[ElectiveChoice],
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO elective_student_assignments(student_id, electives_json) VALUES (?1, ?2) \
         ON CONFLICT(student_id) DO UPDATE SET electives_json=excluded.electives_json",
        params![student_id, encode_choices(choices)],
    )?;
    Ok(())
}

pub(crate) fn encode_choices(choices: &[ElectiveChoice]) -> String {
    let items: Vec<Value> = choices
        .iter()
        .map(|choice| {
            json!({
                "elective_code": choice.elective_code,
                "batch": choice.batch,
            })
        })
        .collect();
    Value::Array(items).to_string()
}

pub(crate) fn decode_choices(raw: &str) -> Result<Vec<ElectiveChoice>, StoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|_| StoreError::InvalidInput("corrupt elective list"))?;
    let Some(items) = value.as_array() else {
        return Err(StoreError::InvalidInput("corrupt elective list"));
    };
    let mut choices = Vec::with_capacity(items.len());
    for item in items {
        let elective_code = item
            .get("elective_code")
            .and_then(Value::as_str)
            .ok_or(StoreError::InvalidInput("corrupt elective list"))?;
        let batch = item
            .get("batch")
            .and_then(Value::as_i64)
            .ok_or(StoreError::InvalidInput("corrupt elective list"))?;
        choices.push(ElectiveChoice {
            elective_code: elective_code.to_string(),
            batch,
        });
    }
    Ok(choices)
}

pub(crate) fn pull_elective_tx(
    tx: &Transaction<'_>,
    elective_code: &str,
) -> Result<usize, StoreError> {
    let rows: Vec<(String, String)> = {
        let mut stmt =
            tx.prepare("SELECT student_id, electives_json FROM elective_student_assignments")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut pulled = 0;
    for (student_id, raw) in rows {
        let choices = decode_choices(&raw)?;
        let remaining: Vec<ElectiveChoice> = choices
            .iter()
            .filter(|choice| choice.elective_code != elective_code)
            .cloned()
            .collect();
        if remaining.len() == choices.len() {
            continue;
        }
        pulled += choices.len() - remaining.len();
        tx.execute(
            "UPDATE elective_student_assignments SET electives_json=?2 WHERE student_id=?1",
            params![student_id, encode_choices(&remaining)],
        )?;
    }
    Ok(pulled)
}
