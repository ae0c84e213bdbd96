pub mod presign;

pub use presign::PresignService;
