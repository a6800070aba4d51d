//! Mortality tables read from CSV files

use super::{lx_to_qx, MortalityTable, TableError, TableLayout, TableSpec, TableType};
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Table loaded from a CSV file with a header row.
///
/// Rows are expected in ascending, contiguous age order. Blank cells are
/// allowed and end any sequence that reaches them.
#[derive(Debug, Clone)]
pub struct CsvMortalityTable {
    spec: TableSpec,
    age_index: HashMap<u32, usize>,
    data: Vec<Vec<Option<f64>>>,
}

impl CsvMortalityTable {
    pub fn from_path(path: &Path, spec: TableSpec) -> Result<Self, TableError> {
        let file = File::open(path)?;
        let table = Self::from_reader(file, spec)?;
        debug!("loaded {} ages from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, spec: TableSpec) -> Result<Self, TableError> {
        if spec.value_columns.is_empty() {
            return Err(TableError::NoValueColumns);
        }

        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader.headers()?.clone();
        let position = |column: &str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or_else(|| TableError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let age_position = position(spec.age_column.as_str())?;
        let value_positions = spec
            .value_columns
            .iter()
            .map(|column| position(column.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut age_index = HashMap::new();
        let mut data = Vec::new();

        for (row, result) in reader.records().enumerate() {
            let record = result?;

            let age_text = record.get(age_position).unwrap_or("");
            let age = parse_age(age_text).ok_or_else(|| TableError::InvalidValue {
                column: spec.age_column.clone(),
                row,
                value: age_text.to_string(),
            })?;
            age_index.insert(age, row);

            let values = value_positions
                .iter()
                .zip(&spec.value_columns)
                .map(|(&index, column)| parse_cell(record.get(index).unwrap_or(""), column, row))
                .collect::<Result<Vec<_>, _>>()?;
            data.push(values);
        }

        Ok(Self {
            spec,
            age_index,
            data,
        })
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Ages present in the table, ascending
    pub fn ages(&self) -> Vec<u32> {
        let mut ages: Vec<u32> = self.age_index.keys().copied().collect();
        ages.sort_unstable();
        ages
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ultimate_column(&self) -> usize {
        self.spec.value_columns.len() - 1
    }

    fn row_of(&self, age: u32) -> Result<usize, TableError> {
        self.age_index
            .get(&age)
            .copied()
            .ok_or(TableError::AgeNotFound { age })
    }

    /// Values of `column` from `start` down to the first blank cell
    fn column_from(&self, column: usize, start: usize) -> Vec<f64> {
        self.data
            .iter()
            .skip(start)
            .map_while(|row| row[column])
            .collect()
    }

    fn select_horizontal(&self, row: usize) -> Vec<f64> {
        let select = &self.data[row];
        let mut values: Vec<f64> = select.iter().map_while(|value| *value).collect();
        if values.len() == select.len() {
            values.extend(self.column_from(self.ultimate_column(), row + 1));
        }
        values
    }

    fn select_diagonal(&self, row: usize) -> Vec<f64> {
        let ultimate = self.ultimate_column();
        let values: Vec<f64> = (0..ultimate)
            .map_while(|duration| self.data.get(row + duration).and_then(|r| r[duration]))
            .collect();
        if values.len() < ultimate {
            return values;
        }

        let mut values = values;
        values.extend(self.column_from(ultimate, row + ultimate));
        values
    }
}

impl MortalityTable for CsvMortalityTable {
    fn qx(&self, age: u32, select: bool) -> Result<Vec<f64>, TableError> {
        let row = self.row_of(age)?;
        let ultimate = self.ultimate_column();

        let values = match (self.spec.layout, select) {
            (TableLayout::OneDimension, _) => self.column_from(0, row),
            (TableLayout::SelectHorizontal, true) => self.select_horizontal(row),
            (TableLayout::SelectHorizontal, false) => {
                // Ultimate values for an age sit on the row selected `ultimate` years earlier
                let start = row.checked_sub(ultimate).ok_or(TableError::AgeNotFound { age })?;
                self.column_from(ultimate, start)
            }
            (TableLayout::SelectDiagonal, true) => self.select_diagonal(row),
            (TableLayout::SelectDiagonal, false) => self.column_from(ultimate, row),
        };

        Ok(match self.spec.table_type {
            TableType::Qx => values,
            TableType::Lx => lx_to_qx(&values),
        })
    }
}

fn parse_age(text: &str) -> Option<u32> {
    let age: f64 = text.trim().parse().ok()?;
    if age >= 0.0 && age.fract() == 0.0 && age <= u32::MAX as f64 {
        Some(age as u32)
    } else {
        None
    }
}

fn parse_cell(text: &str, column: &str, row: usize) -> Result<Option<f64>, TableError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| TableError::InvalidValue {
            column: column.to_string(),
            row,
            value: text.to_string(),
        })
}
