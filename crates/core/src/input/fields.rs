use crate::types::{InventoryRecord, DEFAULT_CPU, DEFAULT_MEMORY_GIB, DEFAULT_STORAGE_GIB};

use super::{Cell, Row};

/// Logical inventory fields. Each is read from the first of its accepted
/// column names that holds a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Os,
    Cpu,
    Memory,
    Storage,
    Datacenter,
    Environment,
    Database,
}

impl Field {
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["VM Name", "Name"],
            Field::Os => &["OS", "Operating System"],
            Field::Cpu => &["CPU", "vCPU"],
            Field::Memory => &["Memory", "RAM"],
            Field::Storage => &["Storage", "Disk"],
            Field::Datacenter => &["Datacenter", "DC"],
            Field::Environment => &["Environment", "Env"],
            Field::Database => &["Database", "DB"],
        }
    }

    pub fn resolve(self, row: &Row) -> Option<&Cell> {
        self.aliases()
            .iter()
            .filter_map(|alias| row.get(alias))
            .find(|cell| cell.is_present())
    }
}

/// Columns a file must carry, checked against the first row's headers.
pub const REQUIRED_COLUMNS: [&str; 5] = ["VM Name", "OS", "CPU", "Memory", "Storage"];

/// Required column names not found among `columns`. A column satisfies a
/// requirement when its name contains the required name, ignoring case.
/// Aliases only apply when reading values, not here.
pub fn missing_columns<'a>(columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let columns: Vec<&str> = columns.into_iter().collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|required| {
            let needle = required.to_lowercase();
            !columns
                .iter()
                .any(|col| col.to_lowercase().contains(&needle))
        })
        .map(|required| required.to_string())
        .collect()
}

fn text_field(row: &Row, field: Field) -> Option<String> {
    field.resolve(row).and_then(Cell::as_text)
}

fn count_field(row: &Row, field: Field, default: u32, vm_name: &str) -> u32 {
    match field.resolve(row) {
        None => default,
        Some(cell) => cell.as_count().unwrap_or_else(|| {
            tracing::warn!(
                vm = vm_name,
                field = ?field,
                value = ?cell,
                default,
                "non-numeric value, using default"
            );
            default
        }),
    }
}

/// Builds the record for the row at zero-based `index`.
pub fn to_record(row: &Row, index: usize) -> InventoryRecord {
    let name = text_field(row, Field::Name).unwrap_or_else(|| format!("VM-{}", index + 1));
    let cpu = count_field(row, Field::Cpu, DEFAULT_CPU, &name);
    let memory = count_field(row, Field::Memory, DEFAULT_MEMORY_GIB, &name);
    let storage = count_field(row, Field::Storage, DEFAULT_STORAGE_GIB, &name);

    InventoryRecord {
        os: text_field(row, Field::Os).unwrap_or_else(|| "Unknown".to_string()),
        cpu,
        memory,
        storage,
        datacenter: text_field(row, Field::Datacenter).unwrap_or_else(|| "Unknown".to_string()),
        environment: text_field(row, Field::Environment),
        database: text_field(row, Field::Database),
        name,
    }
}
