use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;
use crate::store::counts;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("facturas.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        let c = counts(&conn)?;

        println!();
        println!("Invoices:   {}", c.invoices);
        println!("  compras:  {}", c.compras);
        println!("  finanzas: {}", c.finanzas);
        println!("  gastos:   {}", c.gastos);
        println!("Purchases:  {}", c.purchases);
    } else {
        println!();
        println!("Database not found. Run `facturas init` to set up.");
    }

    Ok(())
}
