use serde::ser::{Serialize, SerializeMap, Serializer};

/// A single CSV field. Empty fields on disk are `None`.
pub type Cell = Option<String>;

/// The persisted table exactly as it sits on disk: a header plus string
/// cells. Column positions are stable; new columns only ever go at the end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Adds every column in `required` that the header lacks, appended in
    /// the given order, and nulls it on every existing row. Returns the
    /// names that were added.
    pub fn reconcile(&mut self, required: &[&str]) -> Vec<String> {
        let mut added = Vec::new();
        for name in required {
            if self.column_index(name).is_none() {
                self.columns.push((*name).to_string());
                added.push((*name).to_string());
            }
        }
        if !added.is_empty() {
            let width = self.columns.len();
            for row in &mut self.rows {
                row.resize(width, None);
            }
        }
        added
    }

    /// Appends a row given as (column, value) pairs. Columns not mentioned
    /// are null; unknown column names are added to the header first.
    pub fn push_row<S: AsRef<str>>(&mut self, values: Vec<(S, Cell)>) -> usize {
        let names: Vec<&str> = values.iter().map(|(name, _)| name.as_ref()).collect();
        self.reconcile(&names);

        let mut row = vec![None; self.columns.len()];
        for (name, value) in values {
            if let Some(idx) = self.column_index(name.as_ref()) {
                row[idx] = value;
            }
        }
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Owned (column, value) view of one row, in header order.
    pub fn row(&self, index: usize) -> Option<RowMap> {
        let row = self.rows.get(index)?;
        Some(RowMap(
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect(),
        ))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowMap> + '_ {
        (0..self.rows.len()).filter_map(|i| self.row(i))
    }

    /// Parses CSV with a header row. Empty input yields an empty table.
    /// Short rows are padded with nulls. Rows longer than the header widen
    /// it with `unnamed_<position>` columns so no field is lost.
    pub fn from_csv(bytes: &[u8]) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let mut columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<Cell> = record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_owned()))
                .collect();
            rows.push(row);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(columns.len());
        while columns.len() < width {
            let mut name = format!("unnamed_{}", columns.len());
            while columns.contains(&name) {
                name.push('_');
            }
            columns.push(name);
        }
        for row in &mut rows {
            row.resize(width, None);
        }

        Ok(Self { columns, rows })
    }

    pub fn to_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
        }
        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

/// One row as ordered (column, value) pairs; serializes as a JSON object
/// that keeps header order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMap(pub Vec<(String, Cell)>);

impl RowMap {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }
}

impl Serialize for RowMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
