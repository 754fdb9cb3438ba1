mod blocks;
mod diagrams;
mod fences;
mod recording;
