use std::{
    io::{self, BufWriter, Write},
    sync::Arc,
};

use storyfront_common::{bail, Conf, Report};
use storyfront_queries::{Cms, IsahcTransport};
use storyfront_viewer::Grid;
use tracing::Instrument as _;

#[tracing::instrument(skip(conf), err)]
pub async fn run(conf: &Conf, pages: Option<usize>) -> Result<(), Report> {
    let transport = IsahcTransport::new(conf.endpoint())?;
    let cms = Cms::new(Arc::new(transport));

    let page_size = conf.page_size() as u32;
    let mut out = BufWriter::new(io::stdout());

    tracing::info!(endpoint = conf.endpoint(), "starting export");

    let written = export(&cms, page_size, conf.site(), pages, &mut out).await?;

    out.flush()?;

    tracing::info!(items = written, "export finished");

    Ok(())
}

/// Pages through the CMS the way the grid does, writing each item as one
/// JSON line. Stops after `pages` pages when given. Returns the number of
/// items written.
#[tracing::instrument(skip(cms, site, out), err)]
pub async fn export<W>(
    cms: &Cms,
    page_size: u32,
    site: &str,
    pages: Option<usize>,
    out: &mut W,
) -> Result<usize, Report>
where
    W: Write,
{
    let mut grid = Grid::pending(None, page_size, site);
    let mut page_index = 0;

    while pages.map_or(true, |max| page_index < max) {
        let request = match grid.on_sentinel_visible() {
            Some(request) => request,
            None => break,
        };

        let span = tracing::debug_span!("export page", page_index = page_index).or_current();

        let page = match cms
            .fetch_page(request.first, request.after.as_deref())
            .instrument(span)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                grid.fail_fetch();

                return Err(err);
            }
        };

        if page.items.is_empty() && page.page_info.has_next_page {
            bail!("page {} was empty but claims more pages follow", page_index);
        }

        let written = grid.items().len();
        grid.apply_page(page);

        for item in &grid.items()[written..] {
            serde_json::to_writer(&mut *out, item)?;
            out.write_all(b"\n")?;
        }

        page_index += 1;
    }

    Ok(grid.items().len())
}
