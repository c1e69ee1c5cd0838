//! Visualization utilities for CVRP solutions.
//!
//! Generates SVG drawings of an instance and a solution, with one color per
//! depot-to-depot trip.

use crate::instance::CvrpInstance;
use crate::solution::Solution;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Trip colors, cycled when a solution has more trips than entries
const TRIP_COLORS: &[&str] = &[
    "#2980b9", "#27ae60", "#8e44ad", "#d35400", "#16a085",
    "#c0392b", "#2c3e50", "#f39c12", "#7f8c8d", "#9b59b6",
];

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Node radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 8.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an SVG drawing of a solution
    pub fn generate_svg(&self, instance: &CvrpInstance, solution: &Solution) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.bounds(instance);
        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .customer {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .depot {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .trip {{ stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            (
                self.margin + (x - min_x) * scale,
                // SVG y-axis points down
                self.height - self.margin - (y - min_y) * scale,
            )
        };

        // Trips first, so the nodes are drawn on top of the lines
        for (trip_index, trip) in solution.trips(instance).iter().enumerate() {
            let color = TRIP_COLORS[trip_index % TRIP_COLORS.len()];
            let mut points = String::new();
            for &node in trip {
                let (x, y) = transform(instance.nodes[node].x, instance.nodes[node].y);
                points.push_str(&format!("{:.1},{:.1} ", x, y));
            }
            svg.push_str(&format!(
                r#"<polyline class="trip" stroke="{}" points="{}"/>
"#,
                color,
                points.trim_end()
            ));
        }

        for node in &instance.nodes {
            let (x, y) = transform(node.x, node.y);
            let class = if node.id == instance.depot { "depot" } else { "customer" };
            svg.push_str(&format!(
                r#"<circle class="{}" cx="{:.1}" cy="{:.1}" r="{}"/>
<text class="label" x="{:.1}" y="{:.1}">{}</text>
"#,
                class,
                x,
                y,
                self.node_radius,
                x + self.node_radius + 2.0,
                y - self.node_radius,
                node.id
            ));
        }

        svg.push_str(&format!(
            r#"<text class="title" x="{}" y="{}">{}: cost {:.2}, {} trips</text>
</svg>
"#,
            self.margin,
            self.margin / 2.0,
            solution.algorithm,
            solution.cost,
            solution.num_trips(instance)
        ));

        svg
    }

    /// Write the SVG for a solution to a file
    pub fn save_svg<P: AsRef<Path>>(
        &self,
        instance: &CvrpInstance,
        solution: &Solution,
        path: P,
    ) -> std::io::Result<()> {
        let svg = self.generate_svg(instance, solution);
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())
    }

    fn bounds(&self, instance: &CvrpInstance) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        for node in &instance.nodes {
            min_x = min_x.min(node.x);
            max_x = max_x.max(node.x);
            min_y = min_y.min(node.y);
            max_y = max_y.max(node.y);
        }

        (min_x, max_x, min_y, max_y)
    }
}
