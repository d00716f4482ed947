use std::path::Path;

use super::{ObjError, ObjModel, load_obj_buf};

mod load_test;

const CUBE_MTL: &str = include_str!("cube.mtl");
const CUBE_SMOOTH_OBJ: &str = include_str!("cube_smooth.obj");
const CUBE_FACETED_OBJ: &str = include_str!("cube_faceted.obj");

/// Material loader serving the fixture library.
fn fixture_materials(path: &Path) -> tobj::MTLLoadResult {
    if path == Path::new("cube.mtl") {
        tobj::load_mtl_buf(&mut CUBE_MTL.as_bytes())
    } else {
        Err(tobj::LoadError::OpenFileFailed)
    }
}

/// Load OBJ text against the fixture library.
fn load_fixture(obj: &str) -> Result<ObjModel, ObjError> {
    load_obj_buf(obj.as_bytes(), fixture_materials)
}
