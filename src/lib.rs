//! Sitemap walker and certificate hex formatter
//!
//! This library walks a sitemap index and the sitemaps it lists, and turns
//! binary certificate files into C-style `0xHH` byte lists.

pub mod cert;
pub mod sitemap;
