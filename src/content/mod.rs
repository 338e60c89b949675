//! Public side of the site: static pages, insights, contact, and the shell
//! around them.

pub mod contact;
pub mod insights;
pub mod layout;
pub mod pages;

pub use contact::ContactPage;
pub use insights::{ InsightDetail, InsightsPage };
pub use layout::Chrome;
