pub mod color_namer;
