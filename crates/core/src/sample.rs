use std::{io::Write, path::Path};

use anyhow::Context;

use crate::input::{Cell, Row};

const SAMPLE_OSES: [&str; 11] = [
    "Windows Server 2022",
    "Windows Server 2019",
    "Windows Server 2016",
    "Windows Server 2012 R2",
    "Windows Server 2008 R2",
    "RHEL 9",
    "RHEL 8",
    "RHEL 7",
    "CentOS 7",
    "Ubuntu 22.04",
    "Ubuntu 20.04",
];
const SAMPLE_DATACENTERS: [&str; 4] = ["DC-US-EAST", "DC-US-WEST", "DC-EU-WEST", "DC-APAC"];
const SAMPLE_ENVIRONMENTS: [&str; 4] = ["Production", "Development", "Testing", "Staging"];
const SAMPLE_CPUS: [u32; 4] = [2, 4, 8, 16];
const SAMPLE_MEMORY: [u32; 5] = [4, 8, 16, 32, 64];
const SAMPLE_STORAGE: [u32; 4] = [100, 250, 500, 1000];
const SAMPLE_DATABASES: [&str; 3] = ["SQL Server", "PostgreSQL", "MySQL"];

pub const INVENTORY_HEADER: [&str; 8] = [
    "VM Name",
    "OS",
    "CPU",
    "Memory",
    "Storage",
    "Datacenter",
    "Environment",
    "Database",
];

/// Demo inventory of `count` VMs. Values cycle through fixed vocabularies,
/// so the same count always yields the same rows.
pub fn sample_inventory(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            // Three in ten VMs host a database.
            let database = if i % 10 < 3 {
                SAMPLE_DATABASES[i % SAMPLE_DATABASES.len()]
            } else {
                "None"
            };
            vec![
                format!("VM-{:04}", i + 1),
                SAMPLE_OSES[i % SAMPLE_OSES.len()].to_string(),
                SAMPLE_CPUS[(i / 2) % SAMPLE_CPUS.len()].to_string(),
                SAMPLE_MEMORY[(i / 3) % SAMPLE_MEMORY.len()].to_string(),
                SAMPLE_STORAGE[(i / 5) % SAMPLE_STORAGE.len()].to_string(),
                SAMPLE_DATACENTERS[i % SAMPLE_DATACENTERS.len()].to_string(),
                SAMPLE_ENVIRONMENTS[(i / 7) % SAMPLE_ENVIRONMENTS.len()].to_string(),
                database.to_string(),
            ]
        })
        .collect()
}

/// [`sample_inventory`] as analyzer input rows.
pub fn sample_rows(count: usize) -> Vec<Row> {
    sample_inventory(count)
        .into_iter()
        .map(|values| {
            INVENTORY_HEADER
                .iter()
                .zip(values)
                .fold(Row::new(), |row, (column, value)| {
                    row.with(*column, Cell::text(&value))
                })
        })
        .collect()
}

/// Blank inventory layouts for the common export tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    RvTools,
    Vmware,
    Manual,
}

impl Template {
    pub fn header(self) -> [&'static str; 8] {
        match self {
            Template::RvTools | Template::Manual => INVENTORY_HEADER,
            Template::Vmware => [
                "VM Name",
                "Operating System",
                "vCPU",
                "RAM",
                "Disk",
                "DC",
                "Env",
                "DB",
            ],
        }
    }

    pub fn example_rows(self) -> Vec<[&'static str; 8]> {
        match self {
            Template::RvTools => vec![
                [
                    "Example-VM-001",
                    "Windows Server 2022",
                    "4",
                    "16",
                    "250",
                    "DC-US-EAST",
                    "Production",
                    "SQL Server",
                ],
                [
                    "Example-VM-002",
                    "RHEL 8",
                    "8",
                    "32",
                    "500",
                    "DC-US-WEST",
                    "Development",
                    "None",
                ],
            ],
            Template::Vmware => vec![
                [
                    "Example-VM-001",
                    "Windows Server 2019",
                    "2",
                    "8",
                    "100",
                    "DC-US-EAST",
                    "Production",
                    "None",
                ],
                [
                    "Example-VM-002",
                    "Ubuntu 20.04",
                    "4",
                    "16",
                    "250",
                    "DC-US-WEST",
                    "Testing",
                    "PostgreSQL",
                ],
            ],
            Template::Manual => vec![[""; 8]],
        }
    }

    pub fn write_csv<W: Write>(self, out: W) -> anyhow::Result<()> {
        let mut w = csv::Writer::from_writer(out);
        w.write_record(self.header()).context("write csv header")?;
        for row in self.example_rows() {
            w.write_record(row).context("write csv row")?;
        }
        w.flush().context("flush csv")?;
        Ok(())
    }
}

/// Writes `records` under the standard inventory header.
pub fn write_inventory_csv(path: &Path, records: &[Vec<String>]) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_path(path).with_context(|| format!("create {}", path.display()))?;
    w.write_record(INVENTORY_HEADER).context("write csv header")?;
    for record in records {
        w.write_record(record)
            .with_context(|| format!("write {}", path.display()))?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
