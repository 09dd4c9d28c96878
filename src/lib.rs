//! Core library for the timetable-tools command line application.
//!
//! The library turns a per-grade class schedule workbook into a flat
//! teacher/course/class assignment workbook. IO adapters live under
//! [`timetable::tools::io`], the spreadsheet and record types inside
//! [`timetable::tools::model`], the per-sheet expansion logic in
//! [`timetable::tools::expand`], and the request orchestration under
//! [`timetable::tools::assign`].

pub mod timetable;

pub use timetable::tools::{
    Result, ToolError, assign, config, copier, diagnostics, display, error, expand, header, index,
    io, logging, matcher, model, pipeline, symbol,
};
