use super::labelling::Component;

/// Merge components whose boxes are closer than `distance` on both axes
///
/// Runs full passes over every pair until a pass merges nothing. A merged
/// component keeps the position of its earliest member, so the discovery
/// order of the input is preserved. Object counts on a sheet are small, the
/// quadratic scan is fine.
pub fn merge_nearby(mut components: Vec<Component>, distance: u32) -> Vec<Component> {
    loop {
        let mut merged_any = false;
        let mut i = 0;
        while i < components.len() {
            let mut j = i + 1;
            while j < components.len() {
                let (gap_x, gap_y) = components[i].rect.gap(&components[j].rect);
                if gap_x < distance && gap_y < distance {
                    let absorbed = components.remove(j);
                    let target = &mut components[i];
                    target.rect = target.rect.union(&absorbed.rect);
                    target.pixel_count += absorbed.pixel_count;
                    merged_any = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
        if !merged_any {
            return components;
        }
    }
}
