use log::debug;
use nsd_core::{fence::FenceType, provider::PriceArea};
use nsd_utils::units::kg_to_tonnes;

/// Height in metres for `qt` behind the named fence type.
pub fn fence_report(qt: f64, fence_type: &str) -> anyhow::Result<(FenceType, f64)> {
    let fence_type: FenceType = fence_type.parse()?;
    let height = fence_type.required_height(qt);
    debug!("{} fence for Qt {:.1} kg/m: {:.3} m", fence_type, qt, height);
    Ok((fence_type, height))
}

pub fn run_fence(qt: f64, fence_type: &str) -> anyhow::Result<()> {
    let (fence_type, height) = fence_report(qt, fence_type)?;
    println!(
        "Qt {:.1} kg/m ({:.2} t/m) needs a {} fence of {:.2} m",
        qt,
        kg_to_tonnes(qt),
        fence_type,
        height
    );
    Ok(())
}

pub fn run_areas() -> anyhow::Result<()> {
    println!("{:<6}{:<14}{:>10}{:>11}", "Area", "City", "Latitude", "Longitude");
    for area in PriceArea::ALL {
        let location = area.location();
        println!(
            "{:<6}{:<14}{:>10.2}{:>11.2}",
            area.to_string(),
            location.name,
            location.latitude,
            location.longitude
        );
    }
    Ok(())
}
