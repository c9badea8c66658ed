pub mod codec;
pub mod gemini;
pub mod samples;

use crate::error::Result;
use crate::model::Site;

pub trait SiteReader: Iterator<Item = Result<Site>> {
    fn samples(&self) -> &[String];
    fn n_sites(&self) -> usize;
}
