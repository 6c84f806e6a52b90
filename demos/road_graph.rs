use clap::Parser;
use geo_roadgraph::geojson_io::{elements_from_geojson, graph_to_geojson};
use geo_roadgraph::{build_road_graph, RoadGraphConfig, DEFAULT_OFFSET, DEFAULT_TOLERANCE};
use geojson::GeoJson;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input GeoJSON file (road LineStrings with a `type` property)
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file (trimmed roads and junction caps)
    #[arg(short, long)]
    output: PathBuf,

    /// Coincidence tolerance in map units
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Truncation distance for roads without a width
    #[arg(long, default_value_t = DEFAULT_OFFSET)]
    offset: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Reading input from {:?}", args.input);
    let file = File::open(&args.input)?;
    let reader = BufReader::new(file);
    let geojson: GeoJson = serde_json::from_reader(reader)?;

    let elements = elements_from_geojson(&geojson)?;
    println!("Loaded {} roads. Building graph...", elements.len());

    let config = RoadGraphConfig::new()
        .with_tolerance(args.tolerance)
        .with_offset(args.offset);
    let graph = build_road_graph(elements, config)?;

    println!(
        "Found {} elements and {} junctions.",
        graph.elements().len(),
        graph.junctions().len()
    );

    let file = File::create(&args.output)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &GeoJson::FeatureCollection(graph_to_geojson(&graph)))?;

    println!("Wrote output to {:?}", args.output);

    Ok(())
}
