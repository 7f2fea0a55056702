use anyhow::Result;
use featurejitter::{Dataset, FeatureLayer, ShapeKind};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let dataset = Dataset::open(&args.input)?;
    let layer = dataset.layer();

    println!("Dataset: {}", args.input.display());
    println!("Driver: {}", dataset.driver().name());
    println!("Shape type: {}", layer.shape_type());
    println!("Number of features: {}", layer.feature_count());
    match dataset.bounds() {
        Some(rect) => println!(
            "Extent: ({}, {}) - ({}, {})",
            rect.min().x, rect.min().y, rect.max().x, rect.max().y
        ),
        None => println!("Extent: empty"),
    }
    if layer.shape_type() == ShapeKind::Polygon.to_str() {
        let area: f64 = dataset.geometries().map(|g| g.area()).sum();
        println!("Total area: {area}");
    }

    Ok(())
}
