use std::{env::temp_dir, fmt};

use csv::Trim;
use serde::{Deserialize, Serialize};

use csv_binder::{
    BinderError,
    core::item::RecordReader,
    item::csv::{CsvBinderBuilder, record::CsvRecord},
};
use encoding_rs::UTF_8;

#[derive(Deserialize, Serialize, Debug, Clone)]
struct Car {
    year: u16,
    make: String,
    model: String,
    description: String,
}

impl CsvRecord for Car {}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(year={}, make={}, model={}, description={})",
            self.year, self.make, self.model, self.description
        )
    }
}

fn main() -> Result<(), BinderError> {
    env_logger::init();

    let binder = CsvBinderBuilder::new()
        .staging_dir(temp_dir().join("csv-binder-demo"))
        .trim(Trim::All)
        .build();

    let csv = "year::|make::|model::|description

    1948::|Porsche::|356::|Luxury sports car
    1967::|Ford::|Mustang fastback 1967::|American car";

    let cars: Vec<Car> = binder.read_records(csv.as_bytes(), UTF_8, "::|")?;

    let output = temp_dir().join("cars.tsv");
    binder.write_records(&cars, &output, UTF_8, "\t")?;
    println!("Wrote {} cars to {}", cars.len(), output.display());

    // Read the file back one record at a time.
    if let Some(staged) = binder.prepare_processable_path(&output, UTF_8, "\t")? {
        let mut stream = staged.open()?;
        let reader = binder.read_records_lazy::<Car, _>(&mut stream, UTF_8);
        while let Some(car) = reader.read()? {
            println!("{}", car);
        }
    }

    Ok(())
}
