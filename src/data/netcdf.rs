//! NetCDF file loading.
//!
//! Snapshots the structure of a netCDF/HDF5 file into a [`MemoryStore`] so the
//! tree model can be built and edited without holding the file open, and
//! reads individual variables as `f64` arrays for plotting.

use super::{AttributeValue, HierarchicalStore, MemoryStore, ObjectId};
use crate::error::{H5ScopeError, Result};
use ndarray::{ArrayD, IxDyn};
use netcdf::types::{FloatType, IntType, NcVariableType};
use std::path::Path;

/// Load the structure and attributes of a netCDF file into memory.
pub fn load_store(path: &Path) -> Result<MemoryStore> {
    let file = netcdf::open(path)?;
    let mut store = MemoryStore::new();
    let root = store.root();

    for attr in file.attributes() {
        store.set_attribute(&root, attr.name(), attr_value(&attr))?;
    }

    for var in file.variables() {
        add_variable(&mut store, root, &var)?;
    }

    if let Ok(groups) = file.groups() {
        for group in groups {
            add_group(&mut store, root, &group)?;
        }
    }

    tracing::debug!(path = %path.display(), "loaded netCDF structure");
    Ok(store)
}

fn add_group(store: &mut MemoryStore, parent: ObjectId, group: &netcdf::Group<'_>) -> Result<()> {
    let id = store.add_group(parent, &group.name())?;

    for attr in group.attributes() {
        store.set_attribute(&id, attr.name(), attr_value(&attr))?;
    }

    for var in group.variables() {
        add_variable(store, id, &var)?;
    }

    for child_group in group.groups() {
        add_group(store, id, &child_group)?;
    }

    Ok(())
}

fn add_variable(
    store: &mut MemoryStore,
    parent: ObjectId,
    var: &netcdf::Variable<'_>,
) -> Result<()> {
    let shape: Vec<usize> = var
        .dimensions()
        .iter()
        .map(|d: &netcdf::Dimension<'_>| d.len())
        .collect();
    let id = store.add_dataset(parent, &var.name(), &shape)?;

    for attr in var.attributes() {
        store.set_attribute(&id, attr.name(), attr_value(&attr))?;
    }

    Ok(())
}

fn attr_value(attr: &netcdf::Attribute<'_>) -> AttributeValue {
    use netcdf::AttributeValue as Nc;

    match attr.value() {
        Ok(Nc::Uchar(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Schar(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Ushort(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Short(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Uint(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Int(v)) => AttributeValue::Integer(v.into()),
        Ok(Nc::Longlong(v)) => AttributeValue::Integer(v),
        Ok(Nc::Ulonglong(v)) => match i64::try_from(v) {
            Ok(v) => AttributeValue::Integer(v),
            Err(_) => AttributeValue::Float(v as f64),
        },
        Ok(Nc::Float(v)) => AttributeValue::Float(v.into()),
        Ok(Nc::Double(v)) => AttributeValue::Float(v),
        Ok(Nc::Str(v)) => AttributeValue::Text(v),
        Ok(Nc::Uchars(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Schars(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Ushorts(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Shorts(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Uints(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Ints(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Ulonglongs(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Longlongs(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Floats(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Doubles(v)) => AttributeValue::Text(format!("{:?}", v)),
        Ok(Nc::Strs(v)) => AttributeValue::Text(v.join(", ")),
        Err(_) => AttributeValue::Text(format!("{:?}", attr)),
    }
}

/// Read a numeric variable as an `f64` array, applying CF `scale_factor` /
/// `add_offset` when present.
pub fn read_dataset(file_path: &Path, var_path: &str) -> Result<ArrayD<f64>> {
    let file = netcdf::open(file_path)?;

    // Variables in groups are addressed as "group/sub/var".
    let netcdf_path = var_path.trim_start_matches('/');

    let var = file
        .variable(netcdf_path)
        .ok_or_else(|| H5ScopeError::node_not_found(var_path))?;

    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let numeric_attr = |key: &str| {
        var.attribute(key)
            .map(|a| attr_value(&a))
            .and_then(|v| v.as_f64())
    };
    let scale_factor = numeric_attr("scale_factor").unwrap_or(1.0);
    let add_offset = numeric_attr("add_offset").unwrap_or(0.0);

    let mut data = read_variable_array(&var, &shape)?;

    if scale_factor != 1.0 || add_offset != 0.0 {
        data.mapv_inplace(|v| v * scale_factor + add_offset);
    }

    tracing::debug!(var = var_path, ?shape, "read dataset");
    Ok(data)
}

fn read_variable_array(var: &netcdf::Variable<'_>, shape: &[usize]) -> Result<ArrayD<f64>> {
    let from_vec = |v: Vec<f64>| -> Result<ArrayD<f64>> {
        ArrayD::from_shape_vec(IxDyn(shape), v)
            .map_err(|e| H5ScopeError::NetCDF(format!("Invalid shape/data size: {}", e)))
    };

    macro_rules! read_as {
        ($t:ty) => {{
            let values: Vec<$t> = var.get_values(..)?;
            from_vec(values.into_iter().map(|x| x as f64).collect())
        }};
    }

    match var.vartype() {
        NcVariableType::Float(FloatType::F64) => read_as!(f64),
        NcVariableType::Float(FloatType::F32) => read_as!(f32),
        NcVariableType::Int(IntType::I64) => read_as!(i64),
        NcVariableType::Int(IntType::I32) => read_as!(i32),
        NcVariableType::Int(IntType::I16) => read_as!(i16),
        NcVariableType::Int(IntType::I8) => read_as!(i8),
        NcVariableType::Int(IntType::U64) => read_as!(u64),
        NcVariableType::Int(IntType::U32) => read_as!(u32),
        NcVariableType::Int(IntType::U16) => read_as!(u16),
        NcVariableType::Int(IntType::U8) => read_as!(u8),
        NcVariableType::Char | NcVariableType::String => Err(H5ScopeError::NetCDF(
            "Character/string data cannot be plotted".to_string(),
        )),
        other => Err(H5ScopeError::NetCDF(format!(
            "Unsupported variable type: {:?}",
            other
        ))),
    }
}
