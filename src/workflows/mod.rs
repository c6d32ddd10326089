pub mod sirw;
