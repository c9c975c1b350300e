//! different utility modules used throughout the project
/// tiny module to save sampled series and spectra into files
pub mod logger;
/// PNG plots of the series and its spectra (plotters or gnuplot)
pub mod plots;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
///
mod task_parser_tests;
