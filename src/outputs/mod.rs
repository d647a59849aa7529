//! Output sinks for collected store rows.
//!
//! # Submodules
//!
//! - [`csv`]: Writes one CSV file per site in a configurable legacy encoding
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── mcdonalds.csv   # 지역명, 매장명, 주소, 도로명, 전화번호, 영업시간, 서비스, 위도, 경도
//! └── subway.csv      # same columns without 도로명
//! ```
//!
//! Files are written once, after every region of a site has been collected.

pub mod csv;
