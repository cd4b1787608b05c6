//! # svt_survey
//!
//! svt_survey turns optical survey reports of the SVT (silicon vertex tracker) front
//! layers into detector geometry constants, written in Rust. It reads the flat text
//! reports printed by the CMM software for the U-channel, the 2019 transition fixtures
//! and every half-module fixture, composes the chain of coordinate frames
//! (U-channel ball frame -> pin frame -> sensor frame) and writes one placement per pin
//! frame and per sensor.
//!
//! ## Installation
//!
//! The only method of install is from source. If you have not used Rust before, see the
//! [Rust docs](https://www.rust-lang.org/tools/install) for installing the tool chain.
//!
//! To build and install the CLI use `cargo install --path ./svt_survey_cli` from the top
//! level repository. To use the CLI see the `svt_survey_cli` README.
//!
//! ## Configuration
//!
//! A survey run is described by a YAML file (see [`config::SurveyConfig`]):
//!
//! - year: The detector configuration, 2016 or 2019. 2019 seats layer 1 on a transition
//!   fixture.
//! - output_path: Where the geometry constants are written
//! - csv_path: Optional path for a flat CSV dump of the sensor placements
//! - log_path: Optional log file, used by the CLI
//! - uchannel: For each volume (top/bottom) the report with the four U-channel balls and
//!   the report with the pins and base planes of every layer
//! - transition: For each volume the transition fixture report (2019 only)
//! - modules: One entry per half-module giving its volume, layer, the report of its two
//!   sensors, and the fixture it was surveyed on. The fixture `kind` selects the
//!   measurement convention: `plain`, `matt` or `sho`.
//!
//! ## Survey reports
//!
//! Each measured feature is a free-text label line followed by `X Location`,
//! `Y Location`, `Z Location`, `XY Angle` or `Elevation` lines, the value being the third
//! token on the line. Labels are fixed, e.g. `L1 Hole Ball`, `L2 Slot Pin`,
//! `L3 Base Plane`, `Axi Ball`, `Axial Sensor Plane`. A label that is missing from a
//! report is an error; a holder given no report at all is left zeroed with a warning.
//!
//! ## Output
//!
//! The constants file holds one `<SurveyVolume>` block per (volume, layer) pin frame and
//! per sensor, each with an `<origin>` and three `<unitvec>` elements.
pub mod ball_frame;
pub mod base_plane;
pub mod config;
pub mod error;
pub mod fixture;
pub mod frame;
pub mod ids;
pub mod module_fixture;
pub mod pin;
pub mod process;
pub mod report;
pub mod sensor;
pub mod survey;
pub mod uchannel;
pub mod vector;
pub mod wire;
pub mod writer;
