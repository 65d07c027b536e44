use phf::{Map, phf_map};

pub(super) struct BuiltinType {
    pub well_count: usize,
    pub col_count: usize,
    pub well_volume: f64,
    pub dead_volume: f64,
    pub safe_min_volume: f64,
}

// Volumes in microliters.
pub(super) static BUILTIN_CONTAINER_TYPES: Map<&'static str, BuiltinType> = phf_map! {
    "96-pcr" => BuiltinType { well_count: 96, col_count: 12, well_volume: 160.0, dead_volume: 3.0, safe_min_volume: 5.0 },
    "96-flat" => BuiltinType { well_count: 96, col_count: 12, well_volume: 340.0, dead_volume: 25.0, safe_min_volume: 65.0 },
    "96-flat-uv" => BuiltinType { well_count: 96, col_count: 12, well_volume: 340.0, dead_volume: 25.0, safe_min_volume: 65.0 },
    "96-deep" => BuiltinType { well_count: 96, col_count: 12, well_volume: 2000.0, dead_volume: 15.0, safe_min_volume: 5.0 },
    "96-deep-kf" => BuiltinType { well_count: 96, col_count: 12, well_volume: 1000.0, dead_volume: 15.0, safe_min_volume: 5.0 },
    "384-pcr" => BuiltinType { well_count: 384, col_count: 24, well_volume: 50.0, dead_volume: 8.0, safe_min_volume: 8.0 },
    "384-flat" => BuiltinType { well_count: 384, col_count: 24, well_volume: 112.0, dead_volume: 12.0, safe_min_volume: 15.0 },
    "384-echo" => BuiltinType { well_count: 384, col_count: 24, well_volume: 65.0, dead_volume: 15.0, safe_min_volume: 15.0 },
    "24-deep" => BuiltinType { well_count: 24, col_count: 6, well_volume: 10000.0, dead_volume: 15.0, safe_min_volume: 5.0 },
    "6-flat" => BuiltinType { well_count: 6, col_count: 3, well_volume: 5000.0, dead_volume: 400.0, safe_min_volume: 600.0 },
    "micro-1.5" => BuiltinType { well_count: 1, col_count: 1, well_volume: 1500.0, dead_volume: 15.0, safe_min_volume: 20.0 },
    "micro-2.0" => BuiltinType { well_count: 1, col_count: 1, well_volume: 2000.0, dead_volume: 15.0, safe_min_volume: 40.0 },
};
