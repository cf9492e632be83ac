//! Synthetic NIMROD record streams for tests.
//!
//! [`NimrodBuilder`] writes the byte layout independently of the parser so
//! decode tests check against a second encoding of the format.

use std::io::Write;

/// Element numbers used by the builder.
pub mod element {
    pub const VT_YEAR: usize = 1;
    pub const ROWS: usize = 16;
    pub const COLS: usize = 17;
    pub const N_SPECIFIC_REALS: usize = 22;
    pub const N_SPECIFIC_INTS: usize = 23;
    pub const Y_TOP: usize = 34;
    pub const Y_PIXEL_SIZE: usize = 35;
    pub const X_LEFT: usize = 36;
    pub const X_PIXEL_SIZE: usize = 37;
    pub const MISSING_DATA: usize = 38;
}

/// Common clip boxes, as `(xmin, xmax, ymin, ymax)`.
pub mod bbox {
    /// North-west England, the box used by the radar extraction scripts
    pub const NORTH_WEST_ENGLAND: (f64, f64, f64, f64) = (355000.0, 440000.0, 534000.0, 609000.0);

    /// Clips the minimal raster across the half-pixel boundary
    pub const MINIMAL_HALF_PIXEL: (f64, f64, f64, f64) = (500.0, 1500.0, 5500.0, 6500.0);

    /// Exactly the pixel edges of the minimal raster
    pub const MINIMAL_EDGES: (f64, f64, f64, f64) = (-500.0, 2500.0, 4500.0, 6500.0);
}

/// Builder for a complete NIMROD record stream.
#[derive(Debug, Clone)]
pub struct NimrodBuilder {
    general_ints: [i16; 31],
    general_reals: [f32; 28],
    specific_reals: [f32; 45],
    characters: [u8; 56],
    specific_ints: [i16; 51],
    data: Vec<i16>,
    record_lengths: [Option<i32>; 4],
}

impl NimrodBuilder {
    /// A `rows` x `cols` raster of zeros at 1km spacing with its first
    /// centre at (0, 0).
    pub fn new(rows: i16, cols: i16) -> Self {
        let cells = (rows.max(0) as usize) * (cols.max(0) as usize);
        Self {
            general_ints: [0; 31],
            general_reals: [0.0; 28],
            specific_reals: [0.0; 45],
            characters: [b' '; 56],
            specific_ints: [0; 51],
            data: vec![0; cells],
            record_lengths: [None; 4],
        }
        .with_int(element::ROWS, rows)
        .with_int(element::COLS, cols)
        .with_int(element::N_SPECIFIC_INTS, -1)
        .with_geometry(0.0, 1000.0, 0.0, 1000.0)
        .with_real(element::MISSING_DATA, -1.0)
    }

    /// The 2 x 3 raster `[[1, 2, 3], [4, 5, 6]]` with `x_left = 0`,
    /// `y_top = 6000` and 1000m square pixels.
    pub fn minimal() -> Self {
        Self::new(2, 3)
            .with_geometry(6000.0, 1000.0, 0.0, 1000.0)
            .with_data(vec![1, 2, 3, 4, 5, 6])
            .with_valid_time(2023, 6, 20, 12, 0)
            .with_text("mm/h*32", "Radar composite", "Rainfall rate Composite")
    }

    /// Set `y_top`, `y_pixel_size`, `x_left`, `x_pixel_size`.
    pub fn with_geometry(self, y_top: f32, y_pixel_size: f32, x_left: f32, x_pixel_size: f32) -> Self {
        self.with_real(element::Y_TOP, y_top)
            .with_real(element::Y_PIXEL_SIZE, y_pixel_size)
            .with_real(element::X_LEFT, x_left)
            .with_real(element::X_PIXEL_SIZE, x_pixel_size)
    }

    /// Replace the raster values. The length is not checked against the
    /// dimensions so that malformed payloads can be built.
    pub fn with_data(mut self, data: Vec<i16>) -> Self {
        self.data = data;
        self
    }

    pub fn with_valid_time(self, year: i16, month: i16, day: i16, hour: i16, minute: i16) -> Self {
        self.with_int(element::VT_YEAR, year)
            .with_int(element::VT_YEAR + 1, month)
            .with_int(element::VT_YEAR + 2, day)
            .with_int(element::VT_YEAR + 3, hour)
            .with_int(element::VT_YEAR + 4, minute)
    }

    /// Set the character fields, space padded to 8, 24 and 24 bytes.
    pub fn with_text(mut self, units: &str, data_source: &str, title: &str) -> Self {
        self.characters = [b' '; 56];
        for (offset, width, text) in [(0, 8, units), (8, 24, data_source), (32, 24, title)] {
            let bytes = text.as_bytes();
            let len = bytes.len().min(width);
            self.characters[offset..offset + len].copy_from_slice(&bytes[..len]);
        }
        self
    }

    /// Set an integer element (1-31 or 108-158).
    pub fn with_int(mut self, number: usize, value: i16) -> Self {
        match number {
            1..=31 => self.general_ints[number - 1] = value,
            108..=158 => self.specific_ints[number - 108] = value,
            _ => panic!("element {} is not an integer element", number),
        }
        self
    }

    /// Set a real element (32-104).
    pub fn with_real(mut self, number: usize, value: f32) -> Self {
        match number {
            32..=59 => self.general_reals[number - 32] = value,
            60..=104 => self.specific_reals[number - 60] = value,
            _ => panic!("element {} is not a real element", number),
        }
        self
    }

    /// Override the length prefix before the header.
    pub fn with_header_start_length(mut self, length: i32) -> Self {
        self.record_lengths[0] = Some(length);
        self
    }

    /// Override the length prefix after the header.
    pub fn with_header_end_length(mut self, length: i32) -> Self {
        self.record_lengths[1] = Some(length);
        self
    }

    /// Override the length prefix before the payload.
    pub fn with_data_start_length(mut self, length: i32) -> Self {
        self.record_lengths[2] = Some(length);
        self
    }

    /// Override the length prefix after the payload.
    pub fn with_data_end_length(mut self, length: i32) -> Self {
        self.record_lengths[3] = Some(length);
        self
    }

    /// The bare 512-byte header block.
    pub fn header_block(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(512);
        for v in &self.general_ints {
            out.extend_from_slice(&v.to_be_bytes());
        }
        for v in self.general_reals.iter().chain(&self.specific_reals) {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&self.characters);
        for v in &self.specific_ints {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out
    }

    /// The complete record stream.
    pub fn build(&self) -> Vec<u8> {
        let payload_len = (self.data.len() * 2) as i32;
        let [header_start, header_end, data_start, data_end] = self.record_lengths;

        let mut out = Vec::with_capacity(512 + 16 + self.data.len() * 2);
        out.extend_from_slice(&header_start.unwrap_or(512).to_be_bytes());
        out.extend_from_slice(&self.header_block());
        out.extend_from_slice(&header_end.unwrap_or(512).to_be_bytes());
        out.extend_from_slice(&data_start.unwrap_or(payload_len).to_be_bytes());
        for v in &self.data {
            out.extend_from_slice(&v.to_be_bytes());
        }
        out.extend_from_slice(&data_end.unwrap_or(payload_len).to_be_bytes());
        out
    }

    /// The record stream cut short after `len` bytes.
    pub fn build_truncated(&self, len: usize) -> Vec<u8> {
        let mut out = self.build();
        out.truncate(len);
        out
    }

    /// Write the record stream to `dir/name` and return the path.
    pub fn write_to_dir(&self, dir: &std::path::Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("Failed to create test file");
        file.write_all(&self.build()).expect("Failed to write test file");
        path
    }
}
