use tabled::Table;

use crate::{spotify::resources, types::ResourceTableRow};

pub fn resources() {
    let rows: Vec<ResourceTableRow> = resources::all().iter().map(|r| r.table_row()).collect();
    println!("{}", Table::new(rows));
}
