pub mod vitex;
