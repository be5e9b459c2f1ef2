use crate::core::Result;
use crate::schema::columns::{ROLE, STAFF_NAME};
use crate::storage::Table;
use std::collections::HashSet;

/// Choices for a form dropdown. An empty list is a normal result that the
/// form must handle, usually by disabling the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList {
    pub options: Vec<String>,
}

impl OptionList {
    pub fn new(options: Vec<String>) -> Self {
        Self { options }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }
}

/// Values of `select_column` for rows whose `match_column` equals `target`
/// exactly, in insertion order.
pub fn filter_names(table: &Table, match_column: &str, target: &str, select_column: &str) -> Result<OptionList> {
    let match_idx = table.column_index(match_column)?;
    let select_idx = table.column_index(select_column)?;
    Ok(OptionList::new(
        table
            .rows()
            .iter()
            .filter(|row| row[match_idx].as_str() == Some(target))
            .map(|row| row[select_idx].to_string())
            .collect(),
    ))
}

/// Staff names holding exactly `role`.
pub fn role_options(staff: &Table, role: &str) -> Result<OptionList> {
    filter_names(staff, ROLE, role, STAFF_NAME)
}

/// Distinct values of a column in first-seen order.
pub fn distinct_values(table: &Table, column: &str) -> Result<OptionList> {
    let mut seen = HashSet::new();
    Ok(OptionList::new(
        table
            .column_values(column)?
            .map(|v| v.to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::schema::{EntityType, SchemaRegistry};

    fn staff(entries: &[(&str, &str)]) -> Table {
        let mut table = Table::new(SchemaRegistry::schema(EntityType::Staff).clone());
        for (name, role) in entries {
            table.push(vec![
                Value::from(*name),
                Value::from(""),
                Value::from(""),
                Value::from("Ago"),
                Value::from(*role),
            ]);
        }
        table
    }

    #[test]
    fn test_role_options_in_insertion_order() {
        let table = staff(&[("Alice", "Cell Leader"), ("Bob", "Worker"), ("Carol", "Cell Leader")]);
        let options = role_options(&table, "Cell Leader").unwrap();
        assert_eq!(options.options, vec!["Alice", "Carol"]);
    }

    #[test]
    fn test_role_match_is_exact() {
        let table = staff(&[("Alice", "Cell Leader")]);
        assert!(role_options(&table, "cell leader").unwrap().is_empty());
        assert!(role_options(&table, "Cell").unwrap().is_empty());
    }

    #[test]
    fn test_empty_option_set() {
        let table = staff(&[("Bob", "Worker")]);
        let options = role_options(&table, "PCF Pastor").unwrap();
        assert!(options.is_empty());
        assert_eq!(options.len(), 0);
    }

    #[test]
    fn test_distinct_values() {
        let mut days = Table::new(SchemaRegistry::schema(EntityType::MeetingDay).clone());
        for name in ["Sunday", "Wednesday", "Sunday"] {
            days.push(vec![Value::from(name)]);
        }
        let options = distinct_values(&days, "Meeting Day").unwrap();
        assert_eq!(options.options, vec!["Sunday", "Wednesday"]);
    }
}
