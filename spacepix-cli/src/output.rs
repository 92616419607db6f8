//! Spacepoint writers.

use std::io::Write;

use serde::Serialize;
use spacepix_algorithms::{ClusteringOutput, ClusteringStatistics};

use crate::Result;

/// One output row per cluster.
#[derive(Debug, Serialize)]
struct SpacepointRecord {
    link: usize,
    module: usize,
    global: [f64; 3],
    local: [f64; 2],
    variance: [f64; 2],
    cells: usize,
}

#[derive(Serialize)]
struct Document<'a> {
    statistics: &'a ClusteringStatistics,
    spacepoints: Vec<SpacepointRecord>,
}

fn records(output: &ClusteringOutput) -> Vec<SpacepointRecord> {
    let mut sizes = vec![0usize; output.len()];
    for link in output.cell_links.iter().flatten() {
        sizes[*link] += 1;
    }

    output
        .spacepoints
        .iter()
        .zip(sizes)
        .enumerate()
        .map(|(link, (sp, cells))| SpacepointRecord {
            link,
            module: sp.measurement.module,
            global: sp.global.to_array(),
            local: sp.measurement.local.to_array(),
            variance: sp.measurement.variance.to_array(),
            cells,
        })
        .collect()
}

/// Writes statistics and spacepoints as a pretty-printed JSON document.
pub fn write_json<W: Write>(output: &ClusteringOutput, mut writer: W) -> Result<()> {
    let document = Document {
        statistics: &output.statistics,
        spacepoints: records(output),
    };
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes one CSV row per spacepoint, header first.
pub fn write_csv<W: Write>(output: &ClusteringOutput, mut writer: W) -> Result<()> {
    writeln!(writer, "link,module,x,y,z,local0,local1,var0,var1,cells")?;
    for r in records(output) {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            r.link,
            r.module,
            r.global[0],
            r.global[1],
            r.global[2],
            r.local[0],
            r.local[1],
            r.variance[0],
            r.variance[1],
            r.cells
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacepix_algorithms::{cluster_and_aggregate, ClusteringConfig};
    use spacepix_core::{Cell, Module};

    fn sample_output() -> ClusteringOutput {
        let cells = vec![
            Cell::new(0, 0, 10.0, 0),
            Cell::new(1, 0, 10.0, 0),
            Cell::new(5, 5, 4.0, 0),
        ];
        let modules = vec![Module::new(1.0, 1.0)];
        cluster_and_aggregate(&cells, &modules, &ClusteringConfig::default()).unwrap()
    }

    #[test]
    fn test_csv_rows() {
        let mut buf = Vec::new();
        write_csv(&sample_output(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("link,module,x"));
        assert!(lines[1].starts_with("0,0,0.5,0,0,"));
        assert!(lines[1].ends_with(",2"));
        assert!(lines[2].ends_with(",1"));
    }

    #[test]
    fn test_json_document() {
        let mut buf = Vec::new();
        write_json(&sample_output(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["statistics"]["clusters_found"], 2);
        let points = value["spacepoints"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0]["cells"], 2);
        assert_eq!(points[1]["global"][0], 5.0);
    }
}
