use std::fmt::Write;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lumen_core::mesh::{Vertex, build_tangents};
use lumen_core::obj::{build_mesh, load_obj_buf, parse_obj};

/// A `cells` x `cells` height-field grid, split between two materials.
fn grid_obj(cells: usize) -> String {
    let side = cells + 1;
    let mut obj = String::from("mtllib grid.mtl\no grid\n");
    for z in 0..side {
        for x in 0..side {
            let h = ((x * 7 + z * 13) % 5) as f32 * 0.1;
            writeln!(obj, "v {x} {h} {z}").unwrap();
            writeln!(obj, "vn 0 1 0").unwrap();
            writeln!(obj, "vt {} {}", x as f32 / cells as f32, z as f32 / cells as f32).unwrap();
        }
    }
    for z in 0..cells {
        obj.push_str(if z % 2 == 0 { "usemtl rock\n" } else { "usemtl grass\n" });
        for x in 0..cells {
            let a = z * side + x + 1;
            let b = a + 1;
            let c = a + side + 1;
            let d = a + side;
            writeln!(obj, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c} {d}/{d}/{d}").unwrap();
        }
    }
    obj
}

const GRID_MTL: &str = "newmtl rock\nmap_bump rock_n.png\nnewmtl grass\nKd 0.2 0.6 0.1\n";

fn grid_materials(_: &Path) -> tobj::MTLLoadResult {
    tobj::load_mtl_buf(&mut GRID_MTL.as_bytes())
}

// ---------------------------------------------------------------------------
// OBJ loading
// ---------------------------------------------------------------------------

fn bench_parse_obj(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_obj");
    for cells in [16, 64, 128] {
        let obj = grid_obj(cells);
        group.bench_with_input(BenchmarkId::from_parameter(cells), &obj, |b, obj| {
            b.iter(|| parse_obj(black_box(obj.as_bytes()), grid_materials).unwrap());
        });
    }
    group.finish();
}

fn bench_build_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_mesh");
    for cells in [16, 64, 128] {
        let data = parse_obj(grid_obj(cells).as_bytes(), grid_materials).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(cells), &data, |b, data| {
            b.iter(|| build_mesh(black_box(data)).unwrap());
        });
    }
    group.finish();
}

fn bench_load_obj_buf(c: &mut Criterion) {
    let obj = grid_obj(64);
    c.bench_function("load_obj_buf_64", |b| {
        b.iter(|| load_obj_buf(black_box(obj.as_bytes()), grid_materials).unwrap());
    });
}

// ---------------------------------------------------------------------------
// Tangent frames
// ---------------------------------------------------------------------------

fn bench_build_tangents(c: &mut Criterion) {
    let model = load_obj_buf(grid_obj(128).as_bytes(), grid_materials).unwrap();
    let vertices: Vec<Vertex> = model.mesh.vertices().to_vec();
    let index_arrays: Vec<&[u32]> = model
        .mesh
        .groups()
        .iter()
        .map(|g| g.indices.as_slice())
        .collect();

    c.bench_function("build_tangents_128", |b| {
        b.iter(|| {
            let mut vertices = vertices.clone();
            build_tangents(black_box(&mut vertices), index_arrays.iter().copied())
        });
    });
}

criterion_group!(loading, bench_parse_obj, bench_build_mesh, bench_load_obj_buf);
criterion_group!(tangents, bench_build_tangents);
criterion_main!(loading, tangents);
