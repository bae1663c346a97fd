//! Serializable views of an [`Analysis`] and their human renderings.

use std::io::{self, Write};

use critpath_core::graph::{Graph, GraphStats};
use critpath_core::observe::format_duration;
use critpath_core::{Analysis, CriticalPath, PathMode, PathResult};
use serde::Serialize;

use crate::output::{pretty_kv, pretty_rule, pretty_section};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub vertices: usize,
    pub edges: usize,
    pub components: Vec<ComponentReport>,
    pub condensation: CondensationReport,
    pub source: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest: Option<PathReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest: Option<PathReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path: Option<CriticalPathReport>,
    pub stats: GraphStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentReport {
    pub id: usize,
    pub members: Vec<usize>,
    pub labels: Vec<String>,
    pub cyclic: bool,
}

#[derive(Debug, Serialize)]
pub struct CondensationReport {
    pub vertices: usize,
    pub edges: usize,
    pub order: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct PathReport {
    pub mode: PathMode,
    pub source: usize,
    pub targets: Vec<TargetReport>,
    /// Longest chain starting at `source`; only set for longest paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_path: Option<CriticalPathReport>,
}

/// Distance to one condensation vertex. `distance` is `None` when the
/// vertex cannot be reached.
#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub vertex: usize,
    pub label: String,
    pub distance: Option<f64>,
    pub path: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct CriticalPathReport {
    /// Condensation vertices, in dependency order.
    pub vertices: Vec<usize>,
    pub labels: Vec<String>,
    pub length: f64,
    /// Original vertices behind each condensation vertex.
    pub members: Vec<Vec<usize>>,
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub stage: &'static str,
    pub elapsed_us: u128,
    pub counters: std::collections::BTreeMap<String, u64>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Describe every component of `graph`.
pub fn component_reports(graph: &Graph, analysis: &Analysis) -> Vec<ComponentReport> {
    analysis
        .components
        .iter()
        .enumerate()
        .map(|(id, members)| ComponentReport {
            id,
            members: members.to_vec(),
            labels: members
                .iter()
                .map(|&v| graph.label(v).into_owned())
                .collect(),
            cyclic: analysis.components.is_cyclic(id, graph),
        })
        .collect()
}

fn critical_path_report(analysis: &Analysis, path: &CriticalPath) -> CriticalPathReport {
    CriticalPathReport {
        vertices: path.vertices.clone(),
        labels: path
            .vertices
            .iter()
            .map(|&c| analysis.condensation.label(c).into_owned())
            .collect(),
        length: path.length,
        members: path
            .vertices
            .iter()
            .map(|&c| analysis.members(c).to_vec())
            .collect(),
    }
}

fn path_report(analysis: &Analysis, result: &PathResult) -> PathReport {
    let condensation = &analysis.condensation;
    let targets = condensation
        .vertices()
        .map(|vertex| TargetReport {
            vertex,
            label: condensation.label(vertex).into_owned(),
            distance: (!result.is_unreachable(vertex))
                .then(|| result.distance_to(vertex))
                .flatten(),
            path: result.path_to(vertex),
        })
        .collect();
    let critical_path = match result.mode() {
        PathMode::Longest => result
            .critical_path()
            .map(|path| critical_path_report(analysis, &path)),
        PathMode::Shortest => None,
    };
    PathReport {
        mode: result.mode(),
        source: result.source(),
        targets,
        critical_path,
    }
}

impl AnalysisReport {
    pub fn build(graph: &Graph, analysis: &Analysis) -> Self {
        let condensation = &analysis.condensation;
        let critical_path = analysis
            .critical_path
            .as_ref()
            .map(|path| critical_path_report(analysis, path));

        Self {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            components: component_reports(graph, analysis),
            condensation: CondensationReport {
                vertices: condensation.vertex_count(),
                edges: condensation.edge_count(),
                order: analysis.order.clone(),
            },
            source: analysis.source,
            shortest: analysis
                .shortest
                .as_ref()
                .map(|r| path_report(analysis, r)),
            longest: analysis
                .longest
                .as_ref()
                .map(|r| path_report(analysis, r)),
            critical_path,
            stats: analysis.stats.clone(),
            stages: analysis
                .stages
                .iter()
                .map(|s| StageReport {
                    stage: s.stage,
                    elapsed_us: s.elapsed().as_micros(),
                    counters: s.metrics.counters().clone(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn format_distance(distance: Option<f64>) -> String {
    distance.map_or_else(|| "unreachable".to_string(), |d| format!("{d:.2}"))
}

fn join_ids(ids: &[usize], sep: &str) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Compact line-oriented rendering.
pub fn render_text(report: &AnalysisReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "graph vertices={} edges={} components={} cyclic={}",
        report.vertices,
        report.edges,
        report.components.len(),
        report.stats.cyclic_component_count
    )?;
    for component in &report.components {
        writeln!(
            w,
            "component {} members={} cyclic={}",
            component.id,
            join_ids(&component.members, ","),
            component.cyclic
        )?;
    }
    writeln!(w, "order {}", join_ids(&report.condensation.order, ","))?;
    for paths in [&report.shortest, &report.longest].into_iter().flatten() {
        for target in &paths.targets {
            writeln!(
                w,
                "{} {}->{} distance={} path={}",
                paths.mode.as_str(),
                paths.source,
                target.vertex,
                format_distance(target.distance),
                join_ids(&target.path, ",")
            )?;
        }
        if let Some(cp) = &paths.critical_path {
            writeln!(
                w,
                "{} {}->* critical length={:.2} path={}",
                paths.mode.as_str(),
                paths.source,
                cp.length,
                join_ids(&cp.vertices, ",")
            )?;
        }
    }
    if let Some(cp) = &report.critical_path {
        writeln!(
            w,
            "critical_path length={:.2} path={}",
            cp.length,
            join_ids(&cp.vertices, ",")
        )?;
    }
    for stage in &report.stages {
        writeln!(w, "stage {} elapsed_us={}", stage.stage, stage.elapsed_us)?;
    }
    Ok(())
}

/// Sectioned rendering for terminals.
pub fn render_pretty(report: &AnalysisReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Graph")?;
    pretty_kv(w, "Vertices", report.vertices.to_string())?;
    pretty_kv(w, "Edges", report.edges.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", report.stats.density))?;
    pretty_kv(w, "Components", report.components.len().to_string())?;
    pretty_kv(
        w,
        "Cyclic",
        report.stats.cyclic_component_count.to_string(),
    )?;
    writeln!(w)?;

    render_components_pretty(&report.components, w)?;

    pretty_section(w, "Condensation")?;
    pretty_kv(w, "Nodes", report.condensation.vertices.to_string())?;
    pretty_kv(w, "Edges", report.condensation.edges.to_string())?;
    pretty_kv(w, "Order", join_ids(&report.condensation.order, " -> "))?;
    writeln!(w)?;

    for paths in [&report.shortest, &report.longest].into_iter().flatten() {
        let heading = match paths.mode {
            PathMode::Shortest => "Shortest paths",
            PathMode::Longest => "Longest paths",
        };
        pretty_section(w, &format!("{heading} from {}", paths.source))?;
        for target in &paths.targets {
            writeln!(
                w,
                "  {:>4}  {:>12}  {}",
                target.vertex,
                format_distance(target.distance),
                target.label
            )?;
        }
        if let Some(cp) = &paths.critical_path {
            writeln!(
                w,
                "  Longest chain from {}: {:.2}  {}",
                paths.source,
                cp.length,
                cp.labels.join(" -> ")
            )?;
        }
        writeln!(w)?;
    }

    if let Some(cp) = &report.critical_path {
        pretty_section(w, "Critical path")?;
        pretty_kv(w, "Length", format!("{:.2}", cp.length))?;
        pretty_kv(w, "Path", cp.labels.join(" -> "))?;
        writeln!(w)?;
    }

    if !report.stages.is_empty() {
        pretty_section(w, "Stage timings")?;
        for stage in &report.stages {
            let elapsed = std::time::Duration::from_micros(
                u64::try_from(stage.elapsed_us).unwrap_or(u64::MAX),
            );
            writeln!(w, "  {:<16} {:>10}", stage.stage, format_duration(elapsed))?;
            for (name, value) in &stage.counters {
                writeln!(w, "      {name:<24} {value:>10}")?;
            }
        }
        pretty_rule(w)?;
    }
    Ok(())
}

/// Pretty list of components; cyclic ones are marked with `*`.
pub fn render_components_pretty(
    components: &[ComponentReport],
    w: &mut dyn Write,
) -> io::Result<()> {
    pretty_section(w, &format!("Strongly connected components ({})", components.len()))?;
    for component in components {
        let marker = if component.cyclic { "*" } else { " " };
        writeln!(
            w,
            " {marker}{:>4}  [{}]  {}",
            component.id,
            join_ids(&component.members, ", "),
            component.labels.join(", ")
        )?;
    }
    writeln!(w)
}
