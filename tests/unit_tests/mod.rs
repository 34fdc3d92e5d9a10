mod cell;
mod compact;
mod io;
mod procedural;
