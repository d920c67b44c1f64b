//! some linear algebra functions used throughout the code
#![allow(non_snake_case)]
/// least squares solve through SVD with rank and condition checks
pub mod least_squares;
