pub mod frag;
