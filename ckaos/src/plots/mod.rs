//! Scatter plot of a grid, one dot per marked cell at `(col, row)`.

#[cfg(feature = "plots")]
mod inner {
    use std::path::Path;

    use anyhow::Context;
    use itertools::Itertools;
    use log::info;
    use plotly::color::NamedColor;
    use plotly::common::{
        Marker,
        Mode,
    };
    use plotly::layout::{
        Axis,
        Layout,
    };
    use plotly::{
        Plot,
        Scatter,
    };

    use crate::data_structs::Grid;

    /// Plot side in pixels.
    pub const PLOT_SIZE: usize = 500;

    pub fn grid_scatter(
        grid: &Grid,
        dot_size: usize,
    ) -> Plot {
        let (rows, cols): (Vec<u32>, Vec<u32>) = grid.sorted_cells().into_iter().unzip();
        let trace = Scatter::new(cols, rows)
            .mode(Mode::Markers)
            .marker(Marker::new().size(dot_size).color(NamedColor::Black))
            .show_legend(false);

        let range = vec![0.5, grid.side() as f64 + 0.5];
        let layout = Layout::new()
            .width(PLOT_SIZE)
            .height(PLOT_SIZE)
            .x_axis(Axis::new().range(range.clone()).show_grid(false))
            .y_axis(Axis::new().range(range).show_grid(false));

        let mut plot = Plot::new();
        plot.add_trace(trace);
        plot.set_layout(layout);
        plot
    }

    /// Writes the scatter plot of `grid` as a standalone HTML page.
    pub fn write_grid_plot<P: AsRef<Path>>(
        grid: &Grid,
        dot_size: usize,
        path: P,
    ) -> anyhow::Result<()> {
        let path = path.as_ref();
        let html = grid_scatter(grid, dot_size).to_html();
        std::fs::write(path, html)
            .with_context(|| format!("Failed to write grid plot to {}", path.display()))?;
        info!(
            "Plotted {} cells to {}",
            grid.n_cells(),
            path.display()
        );
        Ok(())
    }

    /// Column/row pairs in plotting order.
    pub fn plot_points(grid: &Grid) -> Vec<(u32, u32)> {
        grid.sorted_cells()
            .into_iter()
            .map(|(row, col)| (col, row))
            .collect_vec()
    }

}

#[cfg(feature = "plots")]
pub use inner::*;
