use clap::Args;
use focusdial_core::dial::{Dial, Point};
use focusdial_core::Event;
use tracing::debug;

use super::print_json;
use crate::state::{open_engine, save_engine};

#[derive(Args)]
pub struct DialArgs {
    /// Pointer positions of one drag gesture, as `x,y`
    #[arg(required = true, allow_hyphen_values = true, value_parser = parse_point)]
    points: Vec<Point>,
    /// Dial center, as `x,y`
    #[arg(long, default_value = "0,0", allow_hyphen_values = true, value_parser = parse_point)]
    center: Point,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x in '{s}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y in '{s}'"))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(format!("non-finite coordinate in '{s}'"));
    }
    Ok(Point::new(x, y))
}

pub fn run(args: DialArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, _) = open_engine()?;
    let mut dial = Dial::new(args.center);

    let mut last: Option<Event> = None;
    for point in args.points {
        let Some(angle) = dial.drag_changed(point) else {
            continue;
        };
        debug!(x = point.x, y = point.y, angle, "dial moved");
        if let Some(event) = engine.apply_dial_angle(angle) {
            last = Some(event);
        }
    }
    dial.drag_ended();

    match last {
        Some(event) => print_json(&event)?,
        None => print_json(&engine.snapshot())?,
    }
    save_engine(&mut engine)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("3,-4").unwrap(), Point::new(3.0, -4.0));
        assert_eq!(parse_point(" 1.5 , 2 ").unwrap(), Point::new(1.5, 2.0));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,b").is_err());
        assert!(parse_point("inf,0").is_err());
    }
}
