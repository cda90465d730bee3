//! Render-graph compilation: dependency-DAG construction, culling, and
//! topological sort (`spec.md` §4.8, "Compile algorithm").

use std::collections::VecDeque;

use thiserror::Error;

use crate::graph::pass::RGPass;
use crate::graph::resource::RGResource;

/// Render-graph compile-time failure (`spec.md` §7, "GraphCompile").
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RgError {
    #[error("render graph has a cycle through pass {0:?}")]
    Cycle(String),
    #[error("render graph pass reads undefined resource {0:?}")]
    UndefinedResource(String),
    #[error("render graph resource {0:?} has incompatible aliasing descriptors")]
    DescriptorConflict(String),
}

/// The result of [`compile`]: the passes to execute, in order, and how many
/// declared passes were culled.
#[derive(Debug, Clone, Default)]
pub struct CompiledGraph {
    pub pass_order: Vec<usize>,
    pub culled_pass_count: usize,
}

/// Stamps `first_write_pass` / `last_use_pass` on every resource, builds the
/// writer-to-reader DAG, marks required passes, and returns them in a
/// stable topological order.
pub fn compile(passes: &[RGPass], resources: &mut [RGResource]) -> Result<CompiledGraph, RgError> {
    stamp_access(passes, resources)?;

    let edges = build_edges(passes, resources);
    let required = mark_required(passes, resources, &edges);
    let order = topological_sort(passes, &edges, &required)?;

    Ok(CompiledGraph { pass_order: order, culled_pass_count: passes.len() - required.iter().filter(|&&r| r).count() })
}

fn stamp_access(passes: &[RGPass], resources: &mut [RGResource]) -> Result<(), RgError> {
    for resource in resources.iter_mut() {
        resource.first_write_pass = None;
        resource.last_use_pass = None;
    }

    for (pass_index, pass) in passes.iter().enumerate() {
        for &handle in &pass.writes {
            let resource = &mut resources[handle.0 as usize];
            if resource.first_write_pass.is_none() {
                resource.first_write_pass = Some(pass_index);
            }
            resource.last_use_pass = Some(pass_index);
        }
        for &handle in &pass.reads {
            resources[handle.0 as usize].last_use_pass = Some(pass_index);
        }
    }

    for (pass_index, pass) in passes.iter().enumerate() {
        for &handle in &pass.reads {
            let resource = &resources[handle.0 as usize];
            let written_before_or_at = resource.first_write_pass.is_some_and(|w| w <= pass_index);
            if !resource.imported && !written_before_or_at {
                return Err(RgError::UndefinedResource(resource.name.clone()));
            }
        }
    }

    Ok(())
}

/// Pass A -> pass B if a resource A writes is read by B (`spec.md` §4.8,
/// step 2).
fn build_edges(passes: &[RGPass], _resources: &[RGResource]) -> Vec<Vec<usize>> {
    let mut edges = vec![Vec::new(); passes.len()];
    for (reader_index, reader) in passes.iter().enumerate() {
        for &handle in &reader.reads {
            for (writer_index, writer) in passes.iter().enumerate() {
                if writer_index != reader_index && writer.writes.contains(&handle) {
                    edges[writer_index].push(reader_index);
                }
            }
        }
    }
    edges
}

/// Every pass with `NeverCull`, every pass writing an imported resource,
/// and transitively every ancestor of a required pass.
fn mark_required(passes: &[RGPass], resources: &[RGResource], edges: &[Vec<usize>]) -> Vec<bool> {
    let mut required = vec![false; passes.len()];
    let mut queue = VecDeque::new();

    for (index, pass) in passes.iter().enumerate() {
        let writes_imported = pass.writes.iter().any(|h| resources[h.0 as usize].imported);
        if pass.flags.contains(crate::graph::pass::PassFlags::NEVER_CULL) || writes_imported {
            if !required[index] {
                required[index] = true;
                queue.push_back(index);
            }
        }
    }

    // Reverse edges: for each required pass, its ancestors (passes that
    // write a resource it reads) become required too.
    let mut reverse_edges = vec![Vec::new(); passes.len()];
    for (writer, readers) in edges.iter().enumerate() {
        for &reader in readers {
            reverse_edges[reader].push(writer);
        }
    }

    while let Some(index) = queue.pop_front() {
        for &ancestor in &reverse_edges[index] {
            if !required[ancestor] {
                required[ancestor] = true;
                queue.push_back(ancestor);
            }
        }
    }

    required
}

/// Kahn's algorithm restricted to required passes, always picking the
/// lowest-insertion-index ready pass so equal-depth passes stay in
/// insertion order (`spec.md` §4.8, step 4).
fn topological_sort(passes: &[RGPass], edges: &[Vec<usize>], required: &[bool]) -> Result<Vec<usize>, RgError> {
    let mut in_degree = vec![0usize; passes.len()];
    for (writer, readers) in edges.iter().enumerate() {
        if !required[writer] {
            continue;
        }
        for &reader in readers {
            if required[reader] {
                in_degree[reader] += 1;
            }
        }
    }

    let mut ready: Vec<usize> = (0..passes.len()).filter(|&i| required[i] && in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(passes.len());

    while !ready.is_empty() {
        ready.sort_unstable();
        let index = ready.remove(0);
        order.push(index);
        for &next in &edges[index] {
            if !required[next] {
                continue;
            }
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(next);
            }
        }
    }

    let required_count = required.iter().filter(|&&r| r).count();
    if order.len() != required_count {
        let stuck = (0..passes.len()).find(|&i| required[i] && !order.contains(&i)).unwrap_or(0);
        return Err(RgError::Cycle(passes[stuck].name.clone()));
    }

    Ok(order)
}
