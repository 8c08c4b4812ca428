use std::fs::File;
use clap::Parser;
use amrgeom::{IntVect, Session};




#[derive(Debug, Parser)]
#[clap(version = "1.0", author = "J. Zrake <jzrake@clemson.edu>")]


/**
 * Build a geometry from runtime parameters, transform it, and optionally
 * write it to a CBOR checkpoint.
 */
struct Opts {
    /// Runtime parameters, e.g. `amr.n_cell=64 64 64`
    params: Vec<String>,

    #[clap(long, number_of_values = 3, allow_hyphen_values = true)]
    coarsen: Option<Vec<i64>>,

    #[clap(long, number_of_values = 3, allow_hyphen_values = true)]
    refine: Option<Vec<i64>>,

    #[clap(short = 'g', long, default_value = "0")]
    num_guard: i64,

    #[clap(short = 'o', long)]
    output: Option<String>,
}




// ============================================================================
fn ratio(components: &[i64]) -> IntVect {
    IntVect::new([components[0], components[1], components[2]])
}




// ============================================================================
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    let session = Session::initialize(&opts.params)?;

    simple_logger::SimpleLogger::new()
        .with_level(session.config().log_level())
        .init()?;

    let mut geometry = session.geometry()?;

    if let Some(r) = &opts.coarsen {
        geometry.coarsen(ratio(r))?;
    }
    if let Some(r) = &opts.refine {
        geometry.refine(ratio(r))?;
    }

    println!("{}", geometry);
    println!("cell size ............. {:?}", geometry.cell_size());
    println!("periodicity ........... {}", geometry.periodicity().period());
    println!("roundoff domain ....... {}", geometry.roundoff_domain());
    println!("grown periodic ........ {}", geometry.grow_periodic_domain(opts.num_guard)?);
    println!("grown non-periodic .... {}", geometry.grow_non_periodic_domain(opts.num_guard)?);

    let corners = [geometry.prob_lo_array(), geometry.prob_hi_array()];
    let outside = geometry.outside_roundoff_mask(&corners);
    println!("corners outside ....... {:?}", outside);

    if let Some(path) = &opts.output {
        ciborium::ser::into_writer(&geometry, File::create(path)?)?;
        println!("write {}", path);
    }
    session.finalize();
    Ok(())
}
